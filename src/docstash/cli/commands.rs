use super::print::{
    print_config, print_full_record, print_messages, print_records, print_session, print_tags,
};
use super::setup::{
    AccountCommands, AddArgs, Cli, Commands, CoreCommands, MiscCommands, TagCommands,
};
use clap::Parser;
use directories::ProjectDirs;
use docstash::api::{ConfigAction, DocstashApi};
use docstash::config::DocstashConfig;
use docstash::error::{DocstashError, Result};
use docstash::model::{Category, QaBody, RecordDraft};
use docstash::providers::auth::FsAuth;
use docstash::providers::blob::FsBlobStore;
use docstash::providers::fs_backend::FsProvider;
use docstash::query::{RecordQuery, SortKey};
use docstash::store::TagDeletePolicy;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const HOME_ENV: &str = "DOCSTASH_HOME";

struct AppContext {
    api: DocstashApi<FsProvider, FsAuth, FsBlobStore>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Core(cmd)) => match cmd {
            CoreCommands::Add(args) => handle_add(&mut ctx, args),
            CoreCommands::List {
                search,
                tag,
                category,
                sort,
            } => handle_list(&mut ctx, search, tag, category, sort),
            CoreCommands::View { id } => handle_view(&mut ctx, &id),
            CoreCommands::Delete { id, yes } => handle_delete(&mut ctx, &id, yes),
            CoreCommands::Tag(cmd) => handle_tag(&mut ctx, cmd),
        },
        Some(Commands::Account(cmd)) => match cmd {
            AccountCommands::Login {
                identifier,
                password,
            } => handle_login(&ctx, &identifier, password),
            AccountCommands::Logout => handle_logout(&ctx),
            AccountCommands::Register {
                identifier,
                password,
            } => handle_register(&ctx, &identifier, password),
            AccountCommands::Whoami => handle_whoami(&ctx),
        },
        Some(Commands::Misc(MiscCommands::Config { key, value })) => {
            handle_config(&ctx, key, value)
        }
        None => handle_list(&mut ctx, None, None, None, None),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("docstash=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .try_init();
}

fn resolve_data_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.data_dir {
        return Ok(dir.clone());
    }
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "docstash", "docstash")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            DocstashError::Validation(format!(
                "could not determine a data directory; set {} or pass --data-dir",
                HOME_ENV
            ))
        })
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = resolve_data_dir(cli)?;
    debug!(data_dir = %data_dir.display(), "using data directory");

    let config = DocstashConfig::load(&data_dir)?;
    let api = DocstashApi::new(
        FsProvider::new(&data_dir),
        FsAuth::new(&data_dir),
        FsBlobStore::new(&data_dir),
        config,
        data_dir,
    );
    Ok(AppContext { api })
}

fn handle_add(ctx: &mut AppContext, args: AddArgs) -> Result<()> {
    let body = match (args.question, args.answer) {
        (Some(question), Some(answer)) => QaBody::new(question, answer).compose(),
        _ => args.body.unwrap_or_default(),
    };
    let mut draft = RecordDraft::new(args.title)
        .with_tags(args.tags)
        .with_body(body)
        .with_category(args.category);
    if let Some(url) = args.url {
        draft = draft.with_url(url);
    }

    let result = match args.attach {
        Some(path) => ctx.api.add_record_with_attachment(&draft, &path)?,
        None => ctx.api.add_record(&draft)?,
    };
    print_messages(&result.messages);
    if let Some(url) = &result.uploaded_url {
        println!("{}", url);
    }
    Ok(())
}

fn handle_list(
    ctx: &mut AppContext,
    search: Option<String>,
    tag: Option<String>,
    category: Option<Category>,
    sort: Option<SortKey>,
) -> Result<()> {
    let mut query = RecordQuery::new()
        .tag(tag)
        .category(category)
        .sort(sort.unwrap_or(ctx.api.settings().default_sort));
    if let Some(text) = search {
        query = query.search(text);
    }

    let result = ctx.api.list(&query)?;
    print_records(&result.listed_records);
    print_messages(&result.messages);
    Ok(())
}

fn handle_view(ctx: &mut AppContext, id: &str) -> Result<()> {
    let result = ctx.api.view(id)?;
    for record in &result.listed_records {
        print_full_record(record);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, id: &str, yes: bool) -> Result<()> {
    if !yes {
        let found = ctx.api.view(id)?;
        let title = found
            .listed_records
            .first()
            .map(|r| r.title.clone())
            .unwrap_or_else(|| id.to_string());
        if !confirm(&format!("Delete '{}'?", title))? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let result = ctx.api.delete_record(id)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_tag(ctx: &mut AppContext, cmd: TagCommands) -> Result<()> {
    match cmd {
        TagCommands::Add { name, scope } => {
            let result = ctx.api.add_tag(&name, scope)?;
            print_messages(&result.messages);
        }
        TagCommands::List { scope, names } => {
            if names {
                for name in ctx.api.tag_options(scope)? {
                    println!("{}", name);
                }
            } else {
                let result = ctx.api.list_tags(scope)?;
                print_tags(&result.listed_tags);
                print_messages(&result.messages);
            }
        }
        TagCommands::Delete {
            tag,
            scope,
            cascade,
            yes,
        } => {
            if !yes && !confirm(&format!("Delete tag '{}'?", tag))? {
                println!("Cancelled.");
                return Ok(());
            }
            let policy = cascade.then_some(TagDeletePolicy::Cascade);
            let result = ctx.api.delete_tag(&tag, scope, policy)?;
            print_messages(&result.messages);
        }
    }
    Ok(())
}

fn handle_login(ctx: &AppContext, identifier: &str, password: Option<String>) -> Result<()> {
    let secret = read_secret(password)?;
    let result = ctx.api.sign_in(identifier, &secret)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_register(ctx: &AppContext, identifier: &str, password: Option<String>) -> Result<()> {
    let secret = read_secret(password)?;
    let result = ctx.api.sign_up(identifier, &secret)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_logout(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.sign_out()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_whoami(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.whoami()?;
    print_session(result.session.as_ref());
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = ctx.api.config(action)?;
    if show_all {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}

/// The secret from `--password`, or one line of stdin.
fn read_secret(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprint!("Password: ");
        io::stderr().flush()?;
    }
    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes"
    ))
}
