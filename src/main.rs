// SPDX-License-Identifier: MPL-2.0
use iced_stories::app::{self, paths, Flags};
use iced_stories::infrastructure::ffmpeg::init_ffmpeg;
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
IcedStories - PeerTube channel stories

USAGE:
  iced_stories [OPTIONS]

OPTIONS:
  --instance <URL>       PeerTube instance, e.g. https://tube.example
  --start <REF>          Start video: search term, /w/<id> link or @account
  --page-count <N>       Number of videos listed from the channel
  --max-duration <SECS>  Longest video included
  --autostart            Start the first story without a click
  --lang <LOCALE>        UI language (en-US, fr)
  --data-dir <DIR>       Directory for state.cbor
  --config-dir <DIR>     Directory for settings.toml
  -h, --help             Print this help
";

fn parse_flags() -> Result<Flags, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let flags = Flags {
        lang: args.opt_value_from_str("--lang")?,
        instance: args.opt_value_from_str("--instance")?,
        start: args.opt_value_from_str("--start")?,
        page_count: args.opt_value_from_str("--page-count")?,
        max_duration: args.opt_value_from_str("--max-duration")?,
        autostart: args.contains("--autostart"),
        data_dir: args.opt_value_from_str("--data-dir")?,
        config_dir: args.opt_value_from_str("--config-dir")?,
    };

    let rest = args.finish();
    if !rest.is_empty() {
        tracing::warn!(?rest, "ignoring unknown arguments");
    }
    Ok(flags)
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let flags = match parse_flags() {
        Ok(flags) => flags,
        Err(err) => {
            eprintln!("error: {err}\n\n{HELP}");
            std::process::exit(2);
        }
    };

    paths::init_cli_overrides(flags.data_dir.clone(), flags.config_dir.clone());

    if let Err(err) = init_ffmpeg() {
        tracing::error!(error = %err, "FFmpeg initialisation failed");
    }

    app::run(flags)
}
