fn main() {
    culprit::cli::run();
}
