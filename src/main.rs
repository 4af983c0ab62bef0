//! Tusk - inspect Mastodon API responses from the terminal
#![allow(clippy::uninlined_format_args)]

use std::collections::HashSet;
use std::io::Read;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tusk::content::{self, PlainTextStyle, Segment};
use tusk::conversation;
use tusk::{Config, Post, ThreadNode, api, thread};

fn main() -> Result<()> {
    // Initialize logging (RUST_LOG=debug for verbose output)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let command = parse_args()?;
    let mut config = match command {
        Command::Help | Command::Version => Config::default(),
        _ => Config::load()?,
    };
    let style = match &command {
        Command::Text { style, .. } | Command::Thread { style, .. } => *style,
        _ => None,
    };
    if let Some(style) = style {
        config.plain_text_style = style;
    }

    match command {
        Command::Text { path, .. } => text_cli(&config, &path),
        Command::Links { path, external } => links_cli(&config, &path, external),
        Command::Segments { path } => segments_cli(&config, &path),
        Command::Thread { path, focal, .. } => thread_cli(&config, &path, focal.as_deref()),
        Command::Handles { input } => {
            handles_cli(&input);
            Ok(())
        }
        Command::Conversations { path, me, with } => {
            conversations_cli(&path, &me, with.as_deref())
        }
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            print_version();
            Ok(())
        }
    }
}

/// CLI commands
enum Command {
    Text {
        path: String,
        style: Option<PlainTextStyle>,
    },
    Links {
        path: String,
        external: bool,
    },
    Segments {
        path: String,
    },
    Thread {
        path: String,
        focal: Option<String>,
        style: Option<PlainTextStyle>,
    },
    Handles {
        input: String,
    },
    Conversations {
        path: String,
        me: String,
        with: Option<String>,
    },
    Help,
    Version,
}

/// Value following `flag` (or its short form)
fn flag_value(args: &[String], long: &str, short: &str) -> Option<String> {
    args.iter()
        .position(|a| a == long || a == short)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn parse_args() -> Result<Command> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() == 1 {
        return Ok(Command::Help);
    }

    let path = || {
        args.get(2)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Missing input file (use - for stdin)"))
    };
    let style = || {
        flag_value(&args, "--style", "-s")
            .map(|s| s.parse::<PlainTextStyle>())
            .transpose()
    };

    match args[1].as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help),
        "-v" | "--version" | "version" => Ok(Command::Version),

        "text" => Ok(Command::Text {
            path: path()?,
            style: style()?,
        }),

        "links" => Ok(Command::Links {
            path: path()?,
            external: args.iter().any(|a| a == "--external" || a == "-e"),
        }),

        "segments" => Ok(Command::Segments { path: path()? }),

        "thread" => Ok(Command::Thread {
            path: path()?,
            focal: flag_value(&args, "--focal", "-f"),
            style: style()?,
        }),

        "handles" => {
            let input = args
                .get(2)
                .ok_or_else(|| anyhow::anyhow!("Missing handle input"))?
                .clone();
            Ok(Command::Handles { input })
        }

        "conversations" | "dm" => {
            let me = flag_value(&args, "--me", "-m")
                .ok_or_else(|| anyhow::anyhow!("Missing --me <account id>"))?;
            Ok(Command::Conversations {
                path: path()?,
                me,
                with: flag_value(&args, "--with", "-w"),
            })
        }

        other => Err(anyhow::anyhow!(
            "Unknown command: {other}\nRun 'tusk --help' for usage"
        )),
    }
}

fn print_help() {
    let config_path = tusk::Config::default_path()
        .map_or_else(|_| "Unknown".to_string(), |p| p.display().to_string());

    println!(
        r#"🐘 Tusk - Mastodon content, thread and conversation tools

USAGE:
    tusk [COMMAND]

COMMANDS:
    text <statuses.json> [OPTIONS]     Print each status as plain text
      Options:
        -s, --style <style>            flat, lines or paragraphs (overrides config)

    links <statuses.json> [OPTIONS]    List links found in each status
      Options:
        -e, --external                 Skip mention, hashtag and excluded-host links

    segments <statuses.json>           Print styled segments as JSON

    thread <statuses.json> [OPTIONS]   Print statuses as reply trees
      Options:
        -f, --focal <status.json>      Status the context belongs to; a /context
                                       response leaves it out, so without it
                                       direct replies print as separate roots
        -s, --style <style>            flat, lines or paragraphs (overrides config)
      Examples:
        tusk thread context.json --focal status.json

    handles <input>                    Show how recipient input is tokenized

    conversations <file.json> [OPTIONS]
      Options:
        -m, --me <id>                  Local account id (required)
        -w, --with <handles>           Only groups with exactly these handles
      Examples:
        tusk conversations dms.json --me 1
        tusk conversations dms.json --me 1 --with alice@m.s,bob

    Use - instead of a file name to read from stdin.

OPTIONS:
    -h, --help                         Show this help message
    -v, --version                      Show version information

CONFIG:
    {}

HOMEPAGE:
    {}
"#,
        config_path,
        tusk::REPO_URL
    );
}

fn print_version() {
    println!("tusk {}", tusk::VERSION);
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))
    }
}

/// Statuses from a JSON array, or from a context response
fn read_posts(path: &str) -> Result<Vec<Post>> {
    let json = read_input(path)?;
    match api::parse_statuses(&json) {
        Ok(posts) => Ok(posts),
        Err(e) => {
            tracing::debug!("Not a status array ({e:#}), trying context");
            api::parse_context(&json)
        }
    }
}

fn header(post: &Post) -> String {
    let boost = post
        .reblogged_by
        .as_ref()
        .map_or_else(String::new, |by| format!(" (boosted by {by})"));
    format!(
        "{} · {}{}",
        post.author.full_handle(),
        post.created_at.format("%Y-%m-%d %H:%M"),
        boost
    )
}

fn text_cli(config: &Config, path: &str) -> Result<()> {
    for post in read_posts(path)? {
        println!("\n{}", header(&post));
        println!("{}", "─".repeat(config.wrap_width.min(60)));
        let text = post.plain_text(config.plain_text_style);
        println!("{}", textwrap::fill(&text, config.wrap_width));
    }
    Ok(())
}

fn links_cli(config: &Config, path: &str, external: bool) -> Result<()> {
    for post in read_posts(path)? {
        let links = if external {
            content::extract_external_links(&post.content, config.excluded_link_hosts.as_slice())
        } else {
            content::extract_links(&post.content)
        };
        if links.is_empty() {
            continue;
        }
        println!("{}", post.id);
        for link in links {
            println!("  {link}");
        }
    }
    Ok(())
}

fn segments_cli(config: &Config, path: &str) -> Result<()> {
    let mut out = Vec::new();
    for post in read_posts(path)? {
        let segments: Vec<Segment> =
            content::to_segments(&post.content, &post.emoji_lookup(), |tag| {
                config.hashtag_url(tag)
            });
        out.push(serde_json::json!({ "id": post.id, "segments": segments }));
    }
    println!(
        "{}",
        serde_json::to_string_pretty(&out).context("Failed to serialize segments")?
    );
    Ok(())
}

fn print_node(config: &Config, node: &ThreadNode, level: usize) {
    let indent = "  ".repeat(level);
    let branch = if level == 0 { "●" } else { "└" };
    println!("{indent}{branch} {}", header(&node.post));

    let body_indent = format!("{indent}  ");
    let options = textwrap::Options::new(config.wrap_width)
        .initial_indent(&body_indent)
        .subsequent_indent(&body_indent);
    let text = node.post.plain_text(config.plain_text_style);
    if !text.is_empty() {
        println!("{}", textwrap::fill(&text, options));
    }

    for child in &node.children {
        print_node(config, child, level + 1);
    }
}

fn thread_cli(config: &Config, path: &str, focal: Option<&str>) -> Result<()> {
    let mut posts = read_posts(path)?;
    if let Some(focal) = focal {
        posts.push(api::parse_status(&read_input(focal)?)?);
    }

    let mut forest = thread::build_forest(posts);
    forest.sort_by_key(|tree| tree.post.created_at);

    for tree in &forest {
        println!();
        print_node(config, tree, 0);
        println!("  ({} posts, depth {})", tree.len(), tree.depth());
    }
    Ok(())
}

fn handles_cli(input: &str) {
    let tokens = conversation::tokenize(input);
    for token in &tokens.completed {
        let normalized = conversation::normalize_handle(token).unwrap_or_default();
        println!("✓ {token:<24} → {normalized}");
    }
    if let Some(active) = &tokens.active {
        println!("… {active:<24} → search:");
        for query in conversation::search_query_variants(active) {
            println!("    {query}");
        }
    }
}

fn conversations_cli(path: &str, me: &str, with: Option<&str>) -> Result<()> {
    let conversations = api::parse_conversations(&read_input(path)?)?;
    let groups = conversation::group_conversations(conversations, me);

    let selected: Vec<&conversation::GroupedConversation> = match with {
        Some(with) => {
            let handles: HashSet<String> = conversation::tokenize(&format!("{with},"))
                .completed
                .iter()
                .filter_map(|h| conversation::normalize_handle(h))
                .collect();
            conversation::exact_participant_matches(&groups, &handles)
        }
        None => groups.iter().collect(),
    };

    for group in selected {
        let handles: Vec<String> = group.participant_handles().into_iter().collect();
        let kind = if group.is_group_chat { "group" } else { "direct" };
        let unread = if group.unread() { " •" } else { "" };
        let last = group
            .last_activity()
            .map_or_else(|| "never".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string());
        println!(
            "[{kind}] {} ({} conversations, last {last}){unread}",
            handles.join(", "),
            group.conversations.len()
        );
    }
    Ok(())
}
