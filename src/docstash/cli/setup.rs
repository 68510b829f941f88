use clap::{Args, Parser, Subcommand};
use docstash::model::Category;
use docstash::query::SortKey;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "docstash", bin_name = "docstash", version)]
#[command(about = "Tagged document and knowledge depository", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (defaults to $DOCSTASH_HOME or the platform data dir)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Core(CoreCommands),

    #[command(flatten)]
    Account(AccountCommands),

    #[command(flatten)]
    Misc(MiscCommands),
}

#[derive(Subcommand, Debug)]
pub enum CoreCommands {
    /// Register a document or knowledge note
    #[command(alias = "n", display_order = 1)]
    Add(AddArgs),

    /// List records
    #[command(alias = "ls", display_order = 2)]
    List {
        /// Text to look for in titles, bodies and tags
        #[arg(short, long)]
        search: Option<String>,

        /// Only records carrying this tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Only records of this category (document, knowledge)
        #[arg(short, long)]
        category: Option<Category>,

        /// Sort order (newest, oldest, title)
        #[arg(long)]
        sort: Option<SortKey>,
    },

    /// Show a record in full
    #[command(alias = "v", display_order = 3)]
    View {
        /// Record id or unique id prefix
        id: String,
    },

    /// Delete a record
    #[command(alias = "rm", display_order = 4)]
    Delete {
        /// Record id or unique id prefix
        id: String,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Manage the tag registry
    #[command(subcommand, display_order = 5)]
    Tag(TagCommands),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Title of the record
    pub title: String,

    /// Tag to file the record under (repeatable)
    #[arg(short, long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Free-form body
    #[arg(short, long, conflicts_with_all = ["question", "answer"])]
    pub body: Option<String>,

    /// Question, for a Q&A note
    #[arg(short, long, requires = "answer")]
    pub question: Option<String>,

    /// Answer, for a Q&A note
    #[arg(short, long, requires = "question")]
    pub answer: Option<String>,

    /// External reference
    #[arg(short, long, conflicts_with = "attach")]
    pub url: Option<String>,

    /// Upload this file and use its URL as the reference
    #[arg(long, value_name = "FILE")]
    pub attach: Option<PathBuf>,

    /// document or knowledge
    #[arg(short, long)]
    pub category: Option<Category>,
}

#[derive(Subcommand, Debug)]
pub enum TagCommands {
    /// Register a tag
    Add {
        name: String,

        /// Restrict the tag to one category
        #[arg(short, long)]
        scope: Option<Category>,
    },

    /// List registered tags
    #[command(alias = "ls")]
    List {
        /// Only tags usable for this category
        #[arg(short, long)]
        scope: Option<Category>,

        /// Print the deduplicated names only
        #[arg(long)]
        names: bool,
    },

    /// Delete a tag
    #[command(alias = "rm")]
    Delete {
        /// Tag id, unique id prefix, or name
        tag: String,

        /// Look names up among tags of this category
        #[arg(short, long)]
        scope: Option<Category>,

        /// Also remove the tag from every record carrying it
        #[arg(long)]
        cascade: bool,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum AccountCommands {
    /// Sign in
    #[command(display_order = 10)]
    Login {
        identifier: String,

        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign out
    #[command(display_order = 11)]
    Logout,

    /// Create a local account
    #[command(display_order = 12)]
    Register {
        identifier: String,

        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Show the signed-in account
    #[command(display_order = 13)]
    Whoami,
}

#[derive(Subcommand, Debug)]
pub enum MiscCommands {
    /// Get or set configuration
    #[command(display_order = 20)]
    Config {
        /// Configuration key (e.g. tag_delete)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}
