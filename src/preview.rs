use anyhow::{Context, Result};
use log::info;

use crate::{cli::PreviewArgs, load, table};

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let options = args.load.to_options()?;
    let frame = load::read_frame(&args.load.input, &options)
        .with_context(|| format!("Loading {:?}", args.load.input))?;
    print!("{}", table::render_frame(&frame, args.rows));
    info!(
        "Displayed {} of {} row(s) from {:?}",
        args.rows.min(frame.row_count()),
        frame.row_count(),
        args.load.input
    );
    Ok(())
}
