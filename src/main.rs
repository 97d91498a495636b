mod cli;

use cli::commands::Command;
use cli::Domineering;
use structopt::StructOpt;

fn main() {
    env_logger::init();
    Domineering::from_args().execute();
}
