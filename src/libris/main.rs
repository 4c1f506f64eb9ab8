use chrono::Local;
use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use libris::api::{ConfigAction, LibrisApi, RecordFilter, RecordStatusFilter};
use libris::config::LibrisConfig;
use libris::error::{LibrisError, Result};
use libris::model::{Book, Date, User};
use libris::store::fs::FileStore;
use std::path::PathBuf;
use std::str::FromStr;

mod args;
mod print;
use args::{BookCommand, Cli, Commands, RecordArgs, UserCommand};
use print::{
    eprint_messages, print_books, print_full, print_json, print_messages, print_records,
    print_summary, print_users,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: LibrisApi<FileStore>,
    json: bool,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Commands::Book(cmd) => handle_book(&mut ctx, cmd)?,
        Commands::User(cmd) => handle_user(&mut ctx, cmd)?,
        Commands::Borrow {
            user_id,
            isbn,
            on,
            due,
        } => handle_borrow(&mut ctx, &user_id, &isbn, on, due)?,
        Commands::Return { record_id, on, fee } => handle_return(&mut ctx, &record_id, on, fee)?,
        Commands::Records(filter) => handle_records(&ctx, filter)?,
        Commands::Report => handle_report(&ctx)?,
        Commands::Available { isbn } => {
            let result = ctx.api.availability(&isbn)?;
            print_messages(&result.messages);
        }
        Commands::Config { key, value } => handle_config(&mut ctx, key, value)?,
    }

    let saved = ctx.api.save_if_dirty()?;
    eprint_messages(&saved.messages);
    Ok(())
}

/// `--data-dir` wins, then `$LIBRIS_HOME`, then the platform data directory.
fn resolve_data_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.data_dir {
        return Ok(dir.clone());
    }
    if let Some(dir) = std::env::var_os("LIBRIS_HOME") {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("org", "libris", "libris")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| LibrisError::Config("Could not determine a data directory".into()))
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = resolve_data_dir(cli)?;
    let config = LibrisConfig::load(&data_dir)?;
    let store = FileStore::new(data_dir.clone()).with_config(&config);

    let (api, loaded) = LibrisApi::open(store, config, data_dir);
    eprint_messages(&loaded.messages);

    Ok(AppContext {
        api,
        json: cli.json,
    })
}

fn parse_date(value: Option<String>) -> Result<Date> {
    match value {
        Some(s) => Date::from_str(&s),
        None => Ok(Date::from(Local::now().date_naive())),
    }
}

fn handle_book(ctx: &mut AppContext, cmd: BookCommand) -> Result<()> {
    let (result, full) = match cmd {
        BookCommand::Add {
            isbn,
            title,
            author,
            year,
            copies,
        } => (
            ctx.api
                .add_book(Book::new(isbn, title, author, year, copies))?,
            None,
        ),
        BookCommand::Remove { isbn } => (ctx.api.remove_book(&isbn)?, None),
        BookCommand::Restock { isbn, copies } => (ctx.api.restock(&isbn, copies)?, None),
        BookCommand::Show { isbn } => (ctx.api.show_book(&isbn)?, Some(true)),
        BookCommand::List => (ctx.api.list_books()?, Some(false)),
    };

    if ctx.json {
        return print_json(&result.books);
    }
    match full {
        Some(true) => print_full(&result.books),
        Some(false) => print_books(&result.books),
        None => {}
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_user(ctx: &mut AppContext, cmd: UserCommand) -> Result<()> {
    let (result, full) = match cmd {
        UserCommand::Add {
            id,
            name,
            student,
            teacher,
        } => {
            let user = match (student, teacher) {
                (Some(major), _) => User::student(id, name, major),
                (None, Some(department)) => User::teacher(id, name, department),
                (None, None) => User::other(id, name),
            };
            (ctx.api.add_user(user)?, None)
        }
        UserCommand::Remove { id } => (ctx.api.remove_user(&id)?, None),
        UserCommand::Show { id } => (ctx.api.show_user(&id)?, Some(true)),
        UserCommand::List => (ctx.api.list_users()?, Some(false)),
        UserCommand::Charge { id, amount } => (ctx.api.charge_fees(&id, amount)?, None),
        UserCommand::Pay { id, amount } => (ctx.api.pay_fees(&id, amount)?, None),
    };

    if ctx.json {
        return print_json(&result.users);
    }
    match full {
        Some(true) => print_full(&result.users),
        Some(false) => print_users(&result.users),
        None => {}
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_borrow(
    ctx: &mut AppContext,
    user_id: &str,
    isbn: &str,
    on: Option<String>,
    due: Option<String>,
) -> Result<()> {
    let borrowed_on = parse_date(on)?;
    let due_on = due.map(|s| Date::from_str(&s)).transpose()?;
    let result = ctx.api.borrow_book(user_id, isbn, borrowed_on, due_on)?;
    if ctx.json {
        return print_json(&result.records);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_return(
    ctx: &mut AppContext,
    record_id: &str,
    on: Option<String>,
    fee: Option<f64>,
) -> Result<()> {
    let returned_on = parse_date(on)?;
    let result = ctx.api.return_book(record_id, returned_on, fee)?;
    if ctx.json {
        return print_json(&result.receipt);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_records(ctx: &AppContext, args: RecordArgs) -> Result<()> {
    let status = if args.active {
        RecordStatusFilter::Active
    } else if args.returned {
        RecordStatusFilter::Returned
    } else {
        RecordStatusFilter::All
    };
    let filter = RecordFilter {
        status,
        user_id: args.user,
        isbn: args.isbn,
    };
    let result = ctx.api.list_records(&filter)?;
    if ctx.json {
        return print_json(&result.records);
    }
    print_records(&result.records);
    print_messages(&result.messages);
    Ok(())
}

fn handle_report(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.summary()?;
    if let Some(summary) = &result.summary {
        if ctx.json {
            return print_json(summary);
        }
        print_summary(summary);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);
    let result = ctx.api.config_action(action)?;

    if show_all {
        if let Some(config) = &result.config {
            if ctx.json {
                return print_json(config);
            }
            for key in libris::config::CONFIG_KEYS {
                println!("{} = {}", key, config.get(key)?);
            }
        }
    }
    print_messages(&result.messages);
    Ok(())
}
