//! wren command line
//!
//! Parses an HTML file or string and prints the elements matched by id,
//! tag, class or XPath queries, or the whole document.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use owo_colors::OwoColorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use wren_common::encoding::{DEFAULT_ENCODING, is_supported};
use wren_dom::{DomTree, NodeId, TagCollection};
use wren_html::{HtmlParser, ParserConfig};

/// wren: parse HTML and query it by id, tag, class or XPath
#[derive(Parser, Debug)]
#[command(name = "wren")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print a parsed document back out
    wren ./index.html

    # Find elements with an XPath expression
    wren ./index.html --xpath '//a[@href][2]'

    # Query inline HTML by class and show the matches as a tree
    wren --html '<ul><li class="x">a</li><li>b</li></ul>' --class x --tree

    # Fail on mismatched close tags
    wren --validate ./page.html
"#)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// HTML file to parse
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse this HTML string instead of a file
    #[arg(long, value_name = "HTML", conflicts_with = "path")]
    html: Option<String>,

    /// Encoding of FILE when it has no byte order mark
    #[arg(long, value_name = "LABEL", default_value = DEFAULT_ENCODING)]
    encoding: String,

    /// Report mismatched close tags and bad attribute names as errors
    #[arg(long)]
    validate: bool,

    /// Select elements with an XPath expression
    #[arg(long, value_name = "EXPR")]
    xpath: Option<String>,

    /// Select the element with this id
    #[arg(long, value_name = "ID")]
    id: Option<String>,

    /// Select elements with this tag name
    #[arg(long, value_name = "NAME")]
    tag: Option<String>,

    /// Select elements carrying this class
    #[arg(long, value_name = "NAME")]
    class: Option<String>,

    /// Print an indented outline instead of markup
    #[arg(long)]
    tree: bool,

    /// Print XHTML (binary attributes as name="name")
    #[arg(long, conflicts_with = "tree")]
    xhtml: bool,

    /// Log parser and query activity to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let parser = load(&cli)?;
    let queries = run_queries(&cli, &parser)?;

    let tree = parser.tree();
    if queries.is_empty() {
        print_document(&cli, &parser);
        return Ok(());
    }
    for (label, found) in &queries {
        let count = match found.len() {
            1 => "1 match".to_string(),
            n => format!("{n} matches"),
        };
        println!("{} {}", format!("=== {label} ===").bold().cyan(), count.dimmed());
        for id in found.iter() {
            println!("{}", render(&cli, tree, id));
        }
    }
    Ok(())
}

/// `RUST_LOG` decides the level, `warn` by default; `--verbose` forces
/// `debug`.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Parse the document named by the arguments.
fn load(cli: &Cli) -> anyhow::Result<HtmlParser> {
    if !is_supported(&cli.encoding) {
        bail!("unknown encoding label {:?}", cli.encoding);
    }
    let config = ParserConfig::default()
        .with_encoding(&cli.encoding)
        .with_validation(cli.validate);
    let mut parser = HtmlParser::with_config(config);

    if let Some(ref html) = cli.html {
        parser.parse_str(html).context("failed to parse --html input")?;
    } else if let Some(ref path) = cli.path {
        parser
            .parse_file(path)
            .with_context(|| format!("failed to parse {}", path.display()))?;
    } else {
        bail!("nothing to parse: pass a FILE or --html");
    }
    debug!(nodes = parser.get_all_nodes().len(), "parsed document");
    Ok(parser)
}

/// Each requested query with its label, in a fixed order.
fn run_queries(cli: &Cli, parser: &HtmlParser) -> anyhow::Result<Vec<(String, TagCollection)>> {
    let mut queries: Vec<(String, TagCollection)> = Vec::new();
    if let Some(ref id) = cli.id {
        let found: TagCollection = parser.get_element_by_id(id).into_iter().collect();
        queries.push((format!("#{id}"), found));
    }
    if let Some(ref tag) = cli.tag {
        queries.push((format!("<{tag}>"), parser.get_elements_by_tag_name(tag)));
    }
    if let Some(ref class) = cli.class {
        queries.push((format!(".{class}"), parser.get_elements_by_class_name(class)));
    }
    if let Some(ref xpath) = cli.xpath {
        let found = parser
            .get_elements_by_xpath(xpath)
            .with_context(|| format!("XPath query {xpath:?} failed"))?;
        queries.push((xpath.clone(), found));
    }
    Ok(queries)
}

fn print_document(cli: &Cli, parser: &HtmlParser) {
    let tree = parser.tree();
    if !cli.tree && !cli.xhtml {
        println!("{}", parser.get_html());
        return;
    }
    if let Some(doctype) = parser.get_doctype() {
        println!("{}", format!("<!{doctype}>").dimmed());
    }
    for root in parser.get_root_nodes() {
        println!("{}", render(cli, tree, root));
    }
}

fn render(cli: &Cli, tree: &DomTree, id: NodeId) -> String {
    if cli.tree {
        tree.dump_tree(id).trim_end().to_string()
    } else if cli.xhtml {
        tree.outer_xhtml(id)
    } else {
        tree.outer_html(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("wren").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_queries_in_order() {
        let cli = cli(&[
            "--html",
            r#"<ul id="l"><li class="x">a</li><li>b</li></ul>"#,
            "--xpath",
            "//li[2]",
            "--class",
            "x",
            "--id",
            "l",
        ]);
        let parser = load(&cli).unwrap();
        let queries = run_queries(&cli, &parser).unwrap();
        let labels: Vec<&str> = queries.iter().map(|(label, _)| label.as_str()).collect();
        assert_eq!(labels, vec!["#l", ".x", "//li[2]"]);
        assert_eq!(parser.tree().text(queries[2].1[0]), "b");
    }

    #[test]
    fn test_missing_id_gives_empty_match() {
        let cli = cli(&["--html", "<p></p>", "--id", "nope"]);
        let parser = load(&cli).unwrap();
        let queries = run_queries(&cli, &parser).unwrap();
        assert!(queries[0].1.is_empty());
    }

    #[test]
    fn test_validate_flag() {
        let cli = cli(&["--validate", "--html", "<div><span></div>"]);
        assert!(load(&cli).is_err());
    }

    #[test]
    fn test_bad_xpath_is_an_error() {
        let cli = cli(&["--html", "<p></p>", "--xpath", "//p[nosuch()]"]);
        let parser = load(&cli).unwrap();
        assert!(run_queries(&cli, &parser).is_err());
    }

    #[test]
    fn test_unknown_encoding() {
        let cli = cli(&["--html", "<p></p>", "--encoding", "no-such-charset"]);
        assert!(load(&cli).is_err());
    }

    #[test]
    fn test_render_modes() {
        let parser = load(&cli(&["--html", "<input checked>"])).unwrap();
        let input = parser.get_root().unwrap();
        let tree = parser.tree();
        assert_eq!(render(&cli(&["--html", ""]), tree, input), "<input checked />");
        assert_eq!(
            render(&cli(&["--html", "", "--xhtml"]), tree, input),
            r#"<input checked="checked" />"#
        );
        assert_eq!(render(&cli(&["--html", "", "--tree"]), tree, input), "<input checked />");
    }
}
