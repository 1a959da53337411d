#![doc = include_str!("../README.md")]

pub mod cli;
pub mod flags;
pub mod service;

fn main() {
    use clap::Parser;

    blockstream_cli::backtrace::enable();
    if let Err(err) = cli::Cli::parse().run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}
