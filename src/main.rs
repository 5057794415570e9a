use clap::Parser;
use log::LevelFilter;

use crate::args::Args;

mod args;
mod rcv;

fn main() {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }

    let res = rcv::config_reader::read_settings(&args).and_then(|s| rcv::run_election(&s));
    if let Err(e) = res {
        eprintln!("An error occurred: {}", e);
        std::process::exit(1);
    }
}
