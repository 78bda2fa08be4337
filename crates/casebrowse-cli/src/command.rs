//! Line commands for the interactive `browse` mode.
//!
//! Plain text replaces the search text. Lines starting with `:` are
//! commands; `:center` and `:category` without a value clear that facet.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Search(String),
    Center(String),
    Category(String),
    Next,
    Prev,
    Page(u64),
    Clear,
    Facets,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ParseError {}

impl BrowseCommand {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        let Some(rest) = line.strip_prefix(':') else {
            return Ok(BrowseCommand::Search(line.to_string()));
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match name {
            "center" | "c" => Ok(BrowseCommand::Center(arg.to_string())),
            "category" | "cat" => Ok(BrowseCommand::Category(arg.to_string())),
            "next" | "n" => Ok(BrowseCommand::Next),
            "prev" | "p" => Ok(BrowseCommand::Prev),
            "page" => arg
                .parse::<u64>()
                .map(BrowseCommand::Page)
                .map_err(|_| ParseError(format!("invalid page number: {:?}", arg))),
            "clear" => Ok(BrowseCommand::Clear),
            "facets" | "f" => Ok(BrowseCommand::Facets),
            "help" | "h" | "?" => Ok(BrowseCommand::Help),
            "quit" | "q" | "exit" => Ok(BrowseCommand::Quit),
            other => Err(ParseError(format!("unknown command: :{}", other))),
        }
    }
}

pub const HELP: &str = "\
Type text to search. Commands:
  :center <code>     filter by center (no value clears)
  :category <code>   filter by category (no value clears)
  :next / :prev      move one page
  :page <n>          jump to page n
  :clear             drop all filters
  :facets            list filter options
  :quit              leave";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_search() {
        assert_eq!(
            BrowseCommand::parse("  stolen bicycle \n"),
            Ok(BrowseCommand::Search("stolen bicycle".into()))
        );
    }

    #[test]
    fn test_empty_line_clears_search() {
        assert_eq!(
            BrowseCommand::parse(""),
            Ok(BrowseCommand::Search(String::new()))
        );
    }

    #[test]
    fn test_facet_commands() {
        assert_eq!(
            BrowseCommand::parse(":center C01"),
            Ok(BrowseCommand::Center("C01".into()))
        );
        assert_eq!(
            BrowseCommand::parse(":category   Theft "),
            Ok(BrowseCommand::Category("Theft".into()))
        );
        assert_eq!(
            BrowseCommand::parse(":center"),
            Ok(BrowseCommand::Center(String::new()))
        );
    }

    #[test]
    fn test_navigation_commands() {
        assert_eq!(BrowseCommand::parse(":next"), Ok(BrowseCommand::Next));
        assert_eq!(BrowseCommand::parse(":p"), Ok(BrowseCommand::Prev));
        assert_eq!(BrowseCommand::parse(":page 3"), Ok(BrowseCommand::Page(3)));
        assert_eq!(BrowseCommand::parse(":clear"), Ok(BrowseCommand::Clear));
        assert_eq!(BrowseCommand::parse(":q"), Ok(BrowseCommand::Quit));
    }

    #[test]
    fn test_bad_page_number() {
        let err = BrowseCommand::parse(":page two").unwrap_err();
        assert!(err.to_string().contains("invalid page number"));
    }

    #[test]
    fn test_unknown_command() {
        let err = BrowseCommand::parse(":frobnicate").unwrap_err();
        assert_eq!(err.to_string(), "unknown command: :frobnicate");
    }
}
