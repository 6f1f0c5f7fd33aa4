use conductor::cli;
use std::io;

fn main() {
    let code = cli::run(
        std::env::args_os(),
        &mut io::stdout(),
        &mut io::stderr(),
        io::stderr,
    );
    std::process::exit(code);
}
