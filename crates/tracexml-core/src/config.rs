//! Configuration Store: the flat property file read once at startup.
//!
//! Every recognized key is read exactly once into [`Config`]. A missing key
//! becomes an empty string, so callers only ever branch on emptiness.
//! Directory-valued keys are normalized at load time to carry exactly one
//! trailing path separator.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use thiserror::Error;

lazy_static! {
    /// Comment lines start with `#` or `!`
    static ref COMMENT: Regex = Regex::new(r"^\s*[#!]").unwrap();
}

/// File name used when no `cfg=` argument is given.
pub const DEFAULT_CONFIG_FILE: &str = "trace-xml.cfg";

/// Top-level document listing handed to the node OID query.
pub const LEVEL1_LISTING: &str = "xml-files.xml";

/// Default external XQuery processor.
pub const DEFAULT_XQUERY_ENGINE: &str = "basex";

/// Default external XSLT processor.
pub const DEFAULT_XSLT_ENGINE: &str = "xsltproc";

/// Serialized form of a query result that matched nothing.
pub const DEFAULT_EMPTY_MARKER: &str = "<nodes/>";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),
    #[error("Unable to load the configuration file {path}. {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Raw key/value pairs of a property file.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    entries: HashMap<String, String>,
}

impl Properties {
    /// Parse property text with `java.util.Properties` rules. Later
    /// duplicates win.
    pub fn parse(text: &str) -> Self {
        let mut entries = HashMap::new();
        let mut logical = String::new();
        let mut continuing = false;

        for raw in text.lines() {
            let line = raw.trim_start();
            if !continuing && (line.is_empty() || COMMENT.is_match(line)) {
                continue;
            }

            if ends_with_odd_backslashes(line) {
                logical.push_str(&line[..line.len() - 1]);
                continuing = true;
                continue;
            }
            logical.push_str(line);
            continuing = false;

            let (key, value) = split_entry(&logical);
            entries.insert(key, value);
            logical.clear();
        }

        if continuing {
            let (key, value) = split_entry(&logical);
            entries.insert(key, value);
        }

        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Read a key, defaulting to the empty string.
    fn string(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }

    /// Read a directory key, normalized to one trailing separator.
    fn directory(&self, key: &str) -> String {
        ensure_trailing_separator(self.get(key).unwrap_or_default())
    }

    fn string_or(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => default.to_string(),
        }
    }
}

/// A line continues on the next one when it ends in an odd run of `\`.
fn ends_with_odd_backslashes(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn is_separator_space(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\x0c'
}

/// Split a logical line at the first unescaped `=`, `:` or whitespace, then
/// unescape both halves.
fn split_entry(line: &str) -> (String, String) {
    let mut key_end = line.len();
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || is_separator_space(c) {
            key_end = i;
            break;
        }
    }

    let mut rest = line[key_end..].trim_start_matches(is_separator_space);
    if let Some(after) = rest.strip_prefix(['=', ':']) {
        rest = after.trim_start_matches(is_separator_space);
    }

    (unescape(&line[..key_end]), unescape(rest))
}

/// Decode `\t`, `\n`, `\r`, `\f` and `\uXXXX`. Any other escaped char stands for itself.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let hex: String = chars.clone().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if hex.len() == 4 => {
                        out.push(decoded);
                        chars.nth(3);
                    }
                    _ => out.push('u'),
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// Append a path separator unless the value is empty or already ends in one.
pub fn ensure_trailing_separator(value: &str) -> String {
    if value.is_empty() || value.ends_with(MAIN_SEPARATOR) || value.ends_with('/') {
        value.to_string()
    } else {
        format!("{}{}", value, MAIN_SEPARATOR)
    }
}

/// Resolved, immutable configuration for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub xquery_path: String,
    pub xml_path: String,
    pub trace_node: String,
    pub trace_node_unique: String,
    pub trace_node_oid: String,
    pub trace_node_details: String,
    pub l3_graph: String,
    pub trace_xsl: String,
    pub text_trace_xsl: String,
    pub trace_html: String,
    pub unreachable_xsl: String,
    pub unreachable_xml: String,
    pub unreachable_html: String,
    pub unreachable_text: String,
    pub data_collection: String,
    pub data_tabulation: String,
    pub data_analysis: String,
    pub odm_xsd_file: String,
    pub define_xsd_file: String,
    pub xquery_engine: String,
    pub xslt_engine: String,
    pub empty_marker: String,
}

impl Config {
    /// Load and resolve a property file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::Unreadable {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        let config = Self::from_properties(&Properties::parse(&text));
        tracing::debug!(path = %path.display(), xml_path = %config.xml_path, "configuration loaded");
        Ok(config)
    }

    pub fn from_properties(props: &Properties) -> Self {
        Self {
            xquery_path: props.directory("xquery-path"),
            xml_path: props.directory("xml-path"),
            trace_node: props.string("trace-node"),
            trace_node_unique: props.string("trace-node-unique"),
            trace_node_oid: props.string("trace-node-oid"),
            trace_node_details: props.string("trace-node-details"),
            l3_graph: props.string("L3-graph"),
            trace_xsl: props.string("trace-xsl"),
            text_trace_xsl: props.string("text-trace-xsl"),
            trace_html: props.string("trace-html"),
            unreachable_xsl: props.string("unreachable-xsl"),
            unreachable_xml: props.string("unreachable-xml"),
            unreachable_html: props.string("unreachable-html"),
            unreachable_text: props.string("unreachable-text"),
            data_collection: props.string("data-collection-file"),
            data_tabulation: props.string("data-tabulation-file"),
            data_analysis: props.string("data-analysis-file"),
            odm_xsd_file: props.string("odm-xsd-file"),
            define_xsd_file: props.string("define-xsd-file"),
            xquery_engine: props.string_or("xquery-engine", DEFAULT_XQUERY_ENGINE),
            xslt_engine: props.string_or("xslt-engine", DEFAULT_XSLT_ENGINE),
            empty_marker: props.string_or("empty-result-marker", DEFAULT_EMPTY_MARKER),
        }
    }

    /// A file inside the XML working directory.
    pub fn output_path(&self, name: &str) -> PathBuf {
        PathBuf::from(format!("{}{}", self.xml_path, name))
    }

    /// A query artifact inside the query directory.
    pub fn query_path(&self, file: &str) -> PathBuf {
        PathBuf::from(format!("{}{}", self.xquery_path, file))
    }

    pub fn graph_document(&self) -> PathBuf {
        self.output_path(&self.l3_graph)
    }

    pub fn level1_listing(&self) -> PathBuf {
        self.output_path(LEVEL1_LISTING)
    }

    pub fn transform_path(&self) -> PathBuf {
        self.output_path(&self.trace_xsl)
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_path(&self.trace_html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# Trace-XML configuration
xquery-path=/opt/trace/xquery
xml-path = /opt/trace/xml/
trace-node: trace-nodes.xml
trace-node-oid=trace-node-oids.xml
! legacy comment
trace-node-details=trace-node-details.xml
L3-graph=graph.graphml
trace-xsl=trace.xsl
trace-html=trace.html
data-collection-file=collection.xml \
    more.xml
"#;

    #[test]
    fn test_parse_separators_and_comments() {
        let props = Properties::parse(SAMPLE);
        assert_eq!(props.get("trace-node"), Some("trace-nodes.xml"));
        assert_eq!(props.get("xml-path"), Some("/opt/trace/xml/"));
        assert_eq!(props.get("L3-graph"), Some("graph.graphml"));
        assert!(props.get("# Trace-XML configuration").is_none());
        assert!(props.get("!").is_none());
    }

    #[test]
    fn test_parse_continuation_line() {
        let props = Properties::parse(SAMPLE);
        assert_eq!(props.get("data-collection-file"), Some("collection.xml more.xml"));
    }

    #[test]
    fn test_escaped_trailing_backslash_ends_the_entry() {
        let props = Properties::parse(
            "xml-path=C:\\\\trace\\\\xml\\\\\nxquery-path=C:\\\\trace\\\\xquery\n",
        );
        assert_eq!(props.get("xml-path"), Some(r"C:\trace\xml\"));
        assert_eq!(props.get("xquery-path"), Some(r"C:\trace\xquery"));

        let config = Config::from_properties(&props);
        assert!(config.xquery_path.starts_with(r"C:\trace\xquery"));
    }

    #[test]
    fn test_odd_backslash_run_still_continues() {
        let props = Properties::parse("share=\\\\\\\n  server\n");
        assert_eq!(props.get("share"), Some(r"\server"));
    }

    #[test]
    fn test_escapes_in_keys_and_values() {
        let props = Properties::parse(
            "trace\\:key = a\\=b\\:c\\ d\\tx\\u0041\nmy\\ key\tvalue\nbare\n",
        );
        assert_eq!(props.get("trace:key"), Some("a=b:c d\txA"));
        assert_eq!(props.get("my key"), Some("value"));
        assert_eq!(props.get("bare"), Some(""));
    }

    #[test]
    fn test_missing_keys_are_empty() {
        let config = Config::from_properties(&Properties::parse(SAMPLE));
        assert_eq!(config.unreachable_xsl, "");
        assert_eq!(config.odm_xsd_file, "");
        assert_eq!(config.trace_node_unique, "");
    }

    #[test]
    fn test_engine_defaults() {
        let config = Config::from_properties(&Properties::default());
        assert_eq!(config.xquery_engine, DEFAULT_XQUERY_ENGINE);
        assert_eq!(config.xslt_engine, DEFAULT_XSLT_ENGINE);
        assert_eq!(config.empty_marker, DEFAULT_EMPTY_MARKER);
        assert_eq!(config.xml_path, "");
        assert_eq!(config.xquery_path, "");
    }

    #[test]
    fn test_directory_gets_one_trailing_separator() {
        let mut props = Properties::default();
        props.insert("xquery-path", "queries");
        let config = Config::from_properties(&props);

        let expected = format!("queries{}", MAIN_SEPARATOR);
        assert_eq!(config.xquery_path, expected);
        assert_eq!(ensure_trailing_separator(&config.xquery_path), expected);
    }

    #[test]
    fn test_existing_separator_is_kept() {
        let config = Config::from_properties(&Properties::parse(SAMPLE));
        assert_eq!(config.xml_path, "/opt/trace/xml/");
        assert_eq!(ensure_trailing_separator(""), "");
    }

    #[test]
    fn test_derived_paths() {
        let config = Config::from_properties(&Properties::parse(SAMPLE));
        assert_eq!(config.graph_document(), PathBuf::from("/opt/trace/xml/graph.graphml"));
        assert_eq!(config.level1_listing(), PathBuf::from("/opt/trace/xml/xml-files.xml"));
        assert_eq!(config.report_path(), PathBuf::from("/opt/trace/xml/trace.html"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/definitely/not/here/trace-xml.cfg").unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, SAMPLE).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.trace_node_oid, "trace-node-oids.xml");
    }
}
