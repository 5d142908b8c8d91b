use clap::Parser;
use ilc_drv::Cli;

fn main() {
    let cli = Cli::parse();
    if let Err(message) = cli.validate() {
        eprintln!("error: {message}");
        std::process::exit(1);
    }

    ilc_drv::init_logging(cli.debug);

    if ilc_drv::run(&cli) {
        std::process::exit(0);
    } else {
        std::process::exit(1);
    }
}
