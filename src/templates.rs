/// settings.toml written by `redditshelf init`
pub const SETTINGS_TEMPLATE: &str = r#"# redditshelf settings
# Generated: {created}
#
# Environment variables take precedence over these values:
#   REDDITSHELF_GENERATOR, REDDITSHELF_TIMEOUT,
#   REDDITSHELF_RETRIES, REDDITSHELF_BACKOFF_MS

[generator]
# Program that turns a story link into an ebook (looked up on PATH)
program = "reddit2epub"
# {link}, {title} and {file} are replaced for every story
args = ["-i", "{link}", "-o", "{file}"]
# Seconds a single attempt may take before it is abandoned
timeout = 600

[retry]
# Attempts per story, including the first one
attempts = 3
# Delay before the first retry; doubled after every retry
backoff_ms = 2000
"#;

/// Banner printed above the story list
pub const LIST_HEADER: &str = r#"
,_, ,_, ,_, ,_, ,_,                ,_, ,_, ,_, ,_, ,_,
| | | | | | | | | |  Last Update:  | | | | | | | | | |
|1| |2| |3| |4| |5|   {date}   |6| |7| |8| |9| |0|
|_| |_| |_| |_| |_|                |_| |_| |_| |_| |_|
===================[ Reddit-Shelf ]===================
"#;
