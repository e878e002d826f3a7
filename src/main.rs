fn main() {
    jaslang::cli::run();
}
