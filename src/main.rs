use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use webp_squeeze::batch::{BatchConfig, CancelToken};
use webp_squeeze::cli::{Args, Commands};
use webp_squeeze::commands::{count_candidates, run_analyze, run_recompress, run_responsive};
use webp_squeeze::info::print_asset_info;
use webp_squeeze::logger::{set_quiet_mode, set_verbose_mode};
use webp_squeeze::menu::Menu;
use webp_squeeze::validation::{is_confirmation, parse_widths, validate_variant_target};

fn main() -> Result<()> {
    let args = Args::parse();
    set_quiet_mode(args.quiet);
    set_verbose_mode(args.verbose);

    let root = match args.root {
        Some(root) => root,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };
    let config = BatchConfig::new(root).with_threads(args.threads);

    match args.command {
        None => {
            let stdin = io::stdin();
            let mut menu = Menu::new(stdin.lock(), io::stdout(), config);
            menu.run()?;
        }
        Some(Commands::Analyze) => {
            run_analyze(&config)?;
        }
        Some(Commands::Recompress { preset, yes }) => {
            let found = count_candidates(&config)?;
            println!("Found {} WebP images under {:?}", found, config.root);
            if !yes && !confirm("Proceed with re-compression? (yes/no): ")? {
                println!("Cancelled");
                return Ok(());
            }
            run_recompress(&config, &preset.policy(), &CancelToken::new())?;
        }
        Some(Commands::Responsive { input, widths }) => {
            let path = validate_variant_target(&input)?;
            let widths = parse_widths(&widths)?;
            run_responsive(&path, &widths);
        }
        Some(Commands::Info { input }) => {
            println!("📋 Getting info for: {:?}", input);
            print_asset_info(&input)?;
        }
    }

    Ok(())
}

fn confirm(message: &str) -> Result<bool> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(is_confirmation(&answer))
}
