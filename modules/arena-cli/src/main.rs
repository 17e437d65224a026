use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use arena_core::{
    load_config, ArenaConfig, BattleJudge, Contender, FixedDraw, PersonaTraits, PromptEvaluator,
    RngDraw, Secrets,
};

#[derive(Parser)]
#[command(name = "arena", about = "Score persona prompts, roll tiers, and judge battles")]
struct Cli {
    /// TOML file with provider and generation settings
    #[arg(long, global = true, env = "ARENA_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score a persona prompt and show its tier odds
    Evaluate { prompt: String },

    /// Score a persona prompt and roll a tier
    Mint {
        prompt: String,

        /// Fixed draw in [0, 100) instead of a random one
        #[arg(long, value_parser = parse_draw)]
        draw: Option<f64>,
    },

    /// Judge two arguments on a topic
    Judge {
        #[arg(long)]
        topic: String,
        #[arg(long)]
        arg1: String,
        #[arg(long)]
        arg2: String,
        #[arg(long, default_value = "persona1")]
        name1: String,
        #[arg(long, default_value = "persona2")]
        name2: String,
        /// intelligence,creativity,persuasion
        #[arg(long, value_parser = parse_traits, default_value = "50,50,50")]
        traits1: PersonaTraits,
        /// intelligence,creativity,persuasion
        #[arg(long, value_parser = parse_traits, default_value = "50,50,50")]
        traits2: PersonaTraits,
    },

    /// Generate a debate topic
    Topic {
        #[arg(long)]
        theme: Option<String>,
    },
}

fn parse_traits(raw: &str) -> Result<PersonaTraits, String> {
    let values = raw
        .split(',')
        .map(|part| {
            let part = part.trim();
            match part.parse::<u8>() {
                Ok(v) if v <= 100 => Ok(v),
                _ => Err(format!("'{part}' is not a trait value between 0 and 100")),
            }
        })
        .collect::<Result<Vec<u8>, String>>()?;

    match values.as_slice() {
        &[intelligence, creativity, persuasion] => {
            Ok(PersonaTraits::new(intelligence, creativity, persuasion))
        }
        _ => Err(format!(
            "expected intelligence,creativity,persuasion but got {} values",
            values.len()
        )),
    }
}

fn parse_draw(raw: &str) -> Result<f64, String> {
    match raw.parse::<f64>() {
        Ok(v) if (0.0..100.0).contains(&v) => Ok(v),
        _ => Err(format!("'{raw}' is not a draw in [0, 100)")),
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_logging(json: bool) -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("arena=info".parse()?)
        .add_directive("arena_core=info".parse()?);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_logs)?;

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ArenaConfig::default(),
    };
    let secrets = Secrets::from_env();
    secrets.log_redacted();

    let generator = config.build_generator(&secrets)?;

    match cli.command {
        Command::Evaluate { prompt } => {
            let evaluator = PromptEvaluator::new(generator).with_settings(config.evaluation);
            print_json(&evaluator.evaluate(&prompt).await?)?;
        }
        Command::Mint { prompt, draw } => {
            let evaluator = PromptEvaluator::new(generator).with_settings(config.evaluation);
            let outcome = match draw {
                Some(value) => {
                    info!(draw = value, "Using fixed draw");
                    evaluator
                        .evaluate_and_roll(&prompt, &mut FixedDraw(value))
                        .await?
                }
                None => {
                    evaluator
                        .evaluate_and_roll(&prompt, &mut RngDraw::thread())
                        .await?
                }
            };
            print_json(&outcome)?;
        }
        Command::Judge {
            topic,
            arg1,
            arg2,
            name1,
            name2,
            traits1,
            traits2,
        } => {
            let judge = BattleJudge::new(generator)
                .with_judge_settings(config.judge)
                .with_topic_settings(config.topic);
            let persona1 = Contender::new(name1, traits1, arg1);
            let persona2 = Contender::new(name2, traits2, arg2);
            print_json(&judge.judge(&topic, &persona1, &persona2).await?)?;
        }
        Command::Topic { theme } => {
            let judge = BattleJudge::new(generator).with_topic_settings(config.topic);
            let topic = judge.generate_topic(theme.as_deref()).await?;
            println!("{topic}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_trait_triples() {
        assert_eq!(parse_traits("80, 65,90"), Ok(PersonaTraits::new(80, 65, 90)));
        assert!(parse_traits("80,65").is_err());
        assert!(parse_traits("80,65,101").is_err());
        assert!(parse_traits("a,b,c").is_err());
    }

    #[test]
    fn draw_must_be_in_range() {
        assert_eq!(parse_draw("99.5"), Ok(99.5));
        assert!(parse_draw("100").is_err());
        assert!(parse_draw("-1").is_err());
    }

    #[test]
    fn judge_subcommand_parses() {
        let cli = Cli::try_parse_from([
            "arena", "judge", "--topic", "Cats or dogs?", "--arg1", "Cats.", "--arg2", "Dogs.",
            "--traits2", "10,20,30",
        ])
        .unwrap();
        match cli.command {
            Command::Judge { traits1, traits2, name1, .. } => {
                assert_eq!(traits1, PersonaTraits::default());
                assert_eq!(traits2, PersonaTraits::new(10, 20, 30));
                assert_eq!(name1, "persona1");
            }
            _ => panic!("expected judge command"),
        }
    }
}
