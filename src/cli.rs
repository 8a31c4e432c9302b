use crate::policy::Preset;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "webp-squeeze",
    about = "Recompress WebP images and generate responsive variants",
    long_about = "webp-squeeze re-encodes WebP images under a transparency-aware quality policy \
                  and derives smaller width variants for srcset. Images with alpha keep their \
                  alpha channel; opaque images are always encoded as lossy RGB. \
                  Run without a subcommand for the interactive menu.",
    version,
    after_help = "EXAMPLES:\n  \
    webp-squeeze\n  \
    webp-squeeze analyze --root ./site\n  \
    webp-squeeze recompress --preset photos --yes\n  \
    webp-squeeze responsive img/product.webp --widths 400,800,1200"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(
        short = 'C',
        long,
        global = true,
        help = "Root directory to scan (default: current directory)"
    )]
    pub root: Option<PathBuf>,

    #[arg(
        short = 'j',
        long,
        global = true,
        help = "Number of parallel workers (default: auto)",
        long_help = "Upper bound on parallel workers. The effective count is further \
                     limited by available memory."
    )]
    pub threads: Option<usize>,

    #[arg(short, long, global = true, help = "Only print errors")]
    pub quiet: bool,

    #[arg(short, long, global = true, help = "Print per-file details")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Report sizes of WebP images under the root",
        long_about = "Inspects the first 50 WebP images under the root and lists \
                      the ones over 200KB and 500KB."
    )]
    Analyze,

    #[command(
        about = "Re-encode every WebP image under the root in place",
        long_about = "Overwrites each WebP image under the root with a re-encoded copy. \
                      There is no backup. Lossless only applies to images with transparency."
    )]
    Recompress {
        #[arg(
            short,
            long,
            value_parser = parse_preset,
            help = "photos (85), graphics (90), thumbnails (75) or lossless"
        )]
        preset: Preset,

        #[arg(short, long, help = "Skip the confirmation prompt")]
        yes: bool,
    },

    #[command(
        about = "Write downscaled width variants of one image",
        long_about = "Writes <stem>-<width>w.<ext> beside the source for every requested \
                      width narrower than the source. Wider widths are skipped."
    )]
    Responsive {
        #[arg(help = "Image file path")]
        input: String,

        #[arg(
            short,
            long,
            default_value = "400,800,1200,1600",
            help = "Comma separated target widths"
        )]
        widths: String,
    },

    #[command(about = "Display the inspection result for one image")]
    Info {
        #[arg(help = "Image file path to analyze")]
        input: PathBuf,
    },
}

fn parse_preset(s: &str) -> Result<Preset, String> {
    s.parse::<Preset>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_is_menu() {
        let args = Args::try_parse_from(["webp-squeeze"]).unwrap();
        assert!(args.command.is_none());
    }

    #[test]
    fn test_recompress_preset() {
        let args =
            Args::try_parse_from(["webp-squeeze", "recompress", "--preset", "lossless", "-y"])
                .unwrap();
        match args.command {
            Some(Commands::Recompress { preset, yes }) => {
                assert_eq!(preset, Preset::Lossless);
                assert!(yes);
            }
            _ => panic!("expected recompress"),
        }
    }

    #[test]
    fn test_recompress_bad_preset() {
        assert!(Args::try_parse_from(["webp-squeeze", "recompress", "--preset", "ultra"]).is_err());
    }

    #[test]
    fn test_global_root_after_subcommand() {
        let args = Args::try_parse_from(["webp-squeeze", "analyze", "--root", "/srv/site"]).unwrap();
        assert_eq!(args.root, Some(PathBuf::from("/srv/site")));
    }
}
