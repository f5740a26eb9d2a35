// pegloom command-line entry point.
// Usage: pegloom [--json] [--max-depth N] [-v] <json FILE | calc EXPR>

fn main() {
    pegloom::cli::run();
}
