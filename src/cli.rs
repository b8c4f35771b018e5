//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "quizgen")]
#[command(about = "Generate prediction quizzes from research papers", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a single quiz from a paper PDF
    Generate {
        /// URL of the paper PDF
        pdf_url: String,

        /// Identifier for the new quiz (lowercase letters, digits, hyphens)
        quiz_id: String,

        /// API key (overrides the environment variable and key file)
        #[arg(long)]
        api_key: Option<String>,

        /// Wait for the full response instead of streaming
        #[arg(long)]
        no_stream: bool,
    },

    /// Generate a collection of quizzes from a blog post's arxiv links
    Collection {
        /// URL of the post to scan for arxiv papers
        source_url: String,

        /// Identifier for the new collection
        collection_id: String,

        /// Collection title (defaults to the page title)
        #[arg(long)]
        title: Option<String>,

        /// API key (overrides the environment variable and key file)
        #[arg(long)]
        api_key: Option<String>,

        /// List the papers that would be generated, then stop
        #[arg(long)]
        dry_run: bool,
    },

    /// Register an already-written quiz or collection module
    Register {
        /// Identifier of the module to register
        id: String,

        /// Register in the collection registry instead of the quiz registry
        #[arg(long)]
        collection: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_command_parsing() {
        let cli = Cli::parse_from([
            "quizgen",
            "generate",
            "https://arxiv.org/pdf/2301.00001.pdf",
            "eval-aware",
        ]);

        match cli.command {
            Command::Generate {
                pdf_url,
                quiz_id,
                api_key,
                no_stream,
            } => {
                assert_eq!(pdf_url, "https://arxiv.org/pdf/2301.00001.pdf");
                assert_eq!(quiz_id, "eval-aware");
                assert!(api_key.is_none());
                assert!(!no_stream);
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_collection_command_flags() {
        let cli = Cli::parse_from([
            "quizgen",
            "--verbose",
            "collection",
            "https://example.com/post",
            "dec-2025",
            "--title",
            "December Papers",
            "--dry-run",
        ]);

        assert!(cli.verbose);
        match cli.command {
            Command::Collection {
                source_url,
                collection_id,
                title,
                dry_run,
                ..
            } => {
                assert_eq!(source_url, "https://example.com/post");
                assert_eq!(collection_id, "dec-2025");
                assert_eq!(title.as_deref(), Some("December Papers"));
                assert!(dry_run);
            }
            _ => panic!("expected collection command"),
        }
    }

    #[test]
    fn test_register_command() {
        let cli = Cli::parse_from(["quizgen", "register", "dec-2025", "--collection"]);

        match cli.command {
            Command::Register { id, collection } => {
                assert_eq!(id, "dec-2025");
                assert!(collection);
            }
            _ => panic!("expected register command"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::parse_from(["quizgen", "--config", "/tmp/custom.yml", "register", "x-1"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/custom.yml")));
    }
}
