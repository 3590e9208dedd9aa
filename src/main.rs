fn main() {
    reimage::run_cli();
}
