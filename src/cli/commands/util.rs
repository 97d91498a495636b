use std::time::Duration;

use domineering::board::Board;
use domineering::game::engine::EngineConfig;
use structopt::StructOpt;

#[derive(StructOpt)]
pub struct EngineArgs {
    #[structopt(short, long, help = "Fixed search depth; omit to use the time budget")]
    pub depth: Option<u8>,
    #[structopt(long = "time", default_value = "60", help = "Total seconds per side")]
    pub total_time_secs: u64,
    #[structopt(long = "cache-mb", default_value = "64")]
    pub cache_size_mb: usize,
    #[structopt(long, default_value = "3")]
    pub reserved_weight: i32,
    #[structopt(long, default_value = "1")]
    pub open_weight: i32,
    #[structopt(long, help = "Disable background move ordering")]
    pub no_move_ordering: bool,
}

pub fn create_config(
    args: &EngineArgs,
    rows: usize,
    cols: usize,
    starting_position: Option<Board>,
) -> EngineConfig {
    EngineConfig {
        rows,
        cols,
        search_depth: args.depth,
        total_time: Duration::from_secs(args.total_time_secs),
        cache_size_mb: args.cache_size_mb,
        reserved_weight: args.reserved_weight,
        open_weight: args.open_weight,
        move_ordering: !args.no_move_ordering,
        starting_position,
    }
}
