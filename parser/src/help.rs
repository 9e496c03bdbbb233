//! Help and usage text rendering.
//!
//! [`HelpFormatter`] reads an [`Options`] registry and produces the usage
//! line and the option listing. It never touches parse state.

use std::collections::HashSet;

use argline_core::{GroupId, OptionGroup, OptionSpec, Options};
use thiserror::Error;

/// Errors from [`HelpFormatter::render_help`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HelpError {
    #[error("usage syntax must not be empty")]
    EmptySyntax,
}

/// Renders usage lines and option listings.
///
/// # Examples
///
/// ```
/// use argline_core::{OptionSpec, Options};
/// use argline_parser::HelpFormatter;
///
/// let options = Options::new()
///     .with_option(OptionSpec::short("a").with_description("all"))
///     .with_option(OptionSpec::short("b").with_arg().required());
///
/// let formatter = HelpFormatter::default();
/// assert_eq!(formatter.render_usage("app", &options), "usage: app [-a] -b <arg>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpFormatter {
    /// Maximum line width.
    pub width: usize,
    /// Spaces before each option in the listing.
    pub left_padding: usize,
    /// Spaces between the option column and its description.
    pub desc_padding: usize,
    /// Text written before the usage syntax.
    pub syntax_prefix: String,
    /// Argument name for options without their own.
    pub arg_name: String,
    /// Written between a long name and its argument.
    pub long_opt_separator: String,
    /// Line terminator.
    pub new_line: String,
    /// Sort options case-insensitively by key; otherwise keep declaration order.
    pub sort: bool,
}

impl Default for HelpFormatter {
    fn default() -> Self {
        Self {
            width: 74,
            left_padding: 1,
            desc_padding: 3,
            syntax_prefix: "usage: ".to_string(),
            arg_name: "arg".to_string(),
            long_opt_separator: " ".to_string(),
            new_line: "\n".to_string(),
            sort: true,
        }
    }
}

impl HelpFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn with_left_padding(mut self, padding: usize) -> Self {
        self.left_padding = padding;
        self
    }

    pub fn with_desc_padding(mut self, padding: usize) -> Self {
        self.desc_padding = padding;
        self
    }

    pub fn with_syntax_prefix(mut self, prefix: &str) -> Self {
        self.syntax_prefix = prefix.to_string();
        self
    }

    pub fn with_arg_name(mut self, name: &str) -> Self {
        self.arg_name = name.to_string();
        self
    }

    pub fn with_long_opt_separator(mut self, separator: &str) -> Self {
        self.long_opt_separator = separator.to_string();
        self
    }

    pub fn with_new_line(mut self, new_line: &str) -> Self {
        self.new_line = new_line.to_string();
        self
    }

    pub fn sorted(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    /// Renders the complete help text: usage, header, options, footer.
    ///
    /// With `auto_usage` the usage line is generated from the registry and
    /// `syntax` is only the program name.
    ///
    /// # Errors
    ///
    /// [`HelpError::EmptySyntax`] if `syntax` is blank.
    pub fn render_help(
        &self,
        syntax: &str,
        header: Option<&str>,
        options: &Options,
        footer: Option<&str>,
        auto_usage: bool,
    ) -> Result<String, HelpError> {
        if syntax.trim().is_empty() {
            return Err(HelpError::EmptySyntax);
        }

        let mut out = String::new();
        let usage = if auto_usage {
            self.render_usage(syntax, options)
        } else {
            self.render_syntax(syntax)
        };
        self.push_line(&mut out, &usage);

        if let Some(header) = header.filter(|h| !h.trim().is_empty()) {
            self.push_line(&mut out, &self.render_wrapped(header, 0));
        }

        let listing = self.render_options(options);
        if !listing.is_empty() {
            self.push_line(&mut out, &listing);
        }

        if let Some(footer) = footer.filter(|f| !f.trim().is_empty()) {
            self.push_line(&mut out, &self.render_wrapped(footer, 0));
        }

        Ok(out)
    }

    /// Renders an explicit usage syntax, e.g. `app [options] FILE`.
    ///
    /// Continuation lines are indented to just past the first word.
    pub fn render_syntax(&self, syntax: &str) -> String {
        let arg_pos = syntax
            .find(' ')
            .map_or(0, |index| syntax[..index].chars().count() + 1);
        let indent = self.syntax_prefix.chars().count() + arg_pos;
        self.render_wrapped(&format!("{}{syntax}", self.syntax_prefix), indent)
    }

    /// Generates a usage line for `app` from the registry.
    ///
    /// Optional options are bracketed, and each group is rendered once as
    /// its members joined with `|`.
    pub fn render_usage(&self, app: &str, options: &Options) -> String {
        let mut processed: HashSet<GroupId> = HashSet::new();
        let mut parts = Vec::new();

        for option in self.ordered(options.options()) {
            match options.group_of(option.key()) {
                Some((id, group)) => {
                    if processed.insert(id) {
                        parts.push(self.render_group(group));
                    }
                }
                None => parts.push(self.render_usage_option(option, option.required)),
            }
        }

        let mut text = format!("{}{app}", self.syntax_prefix);
        if !parts.is_empty() {
            text.push(' ');
            text.push_str(&parts.join(" "));
        }

        let indent = text.find(' ').map_or(0, |index| text[..index].chars().count() + 1);
        self.render_wrapped(&text, indent)
    }

    fn render_group(&self, group: &OptionGroup) -> String {
        let members: Vec<String> = self
            .ordered(&group.options)
            .into_iter()
            .map(|option| self.render_usage_option(option, true))
            .collect();

        if group.required {
            members.join(" | ")
        } else {
            format!("[{}]", members.join(" | "))
        }
    }

    fn render_usage_option(&self, option: &OptionSpec, required: bool) -> String {
        let mut text = String::new();
        if !required {
            text.push('[');
        }

        match (&option.short, &option.long) {
            (Some(short), _) => text.push_str(&format!("-{short}")),
            (None, Some(long)) => text.push_str(&format!("--{long}")),
            (None, None) => {}
        }

        if option.accepts_arg() && option.arg_name.as_deref() != Some("") {
            text.push_str(if option.short.is_some() {
                " "
            } else {
                self.long_opt_separator.as_str()
            });
            text.push_str(&format!("<{}>", self.arg_name_of(option)));
        }

        if !required {
            text.push(']');
        }
        text
    }

    /// Renders the option listing: one entry per option with its
    /// description aligned in a shared column.
    pub fn render_options(&self, options: &Options) -> String {
        let left = " ".repeat(self.left_padding);
        let rows: Vec<(String, Option<&str>)> = self
            .ordered(options.options())
            .into_iter()
            .map(|option| {
                let mut prefix = left.clone();
                match (&option.short, &option.long) {
                    (Some(short), Some(long)) => prefix.push_str(&format!("-{short},--{long}")),
                    (Some(short), None) => prefix.push_str(&format!("-{short}")),
                    (None, Some(long)) => prefix.push_str(&format!("   --{long}")),
                    (None, None) => {}
                }

                if option.accepts_arg() {
                    if option.arg_name.as_deref() == Some("") {
                        prefix.push(' ');
                    } else {
                        prefix.push_str(if option.long.is_some() {
                            self.long_opt_separator.as_str()
                        } else {
                            " "
                        });
                        prefix.push_str(&format!("<{}>", self.arg_name_of(option)));
                    }
                }
                (prefix, option.description.as_deref())
            })
            .collect();

        let max = rows
            .iter()
            .map(|(prefix, _)| prefix.chars().count())
            .max()
            .unwrap_or(0);
        let desc_pad = " ".repeat(self.desc_padding);

        rows.iter()
            .map(|(prefix, description)| {
                let padding = max - prefix.chars().count();
                let mut line = format!("{prefix}{}", " ".repeat(padding));
                if let Some(description) = description {
                    line.push_str(&desc_pad);
                    line.push_str(description);
                }
                self.render_wrapped(&line, max + self.desc_padding)
            })
            .collect::<Vec<_>>()
            .join(&self.new_line)
    }

    /// Wraps `text` to the formatter width, indenting continuation lines by
    /// `indent` columns. Embedded newlines start fresh, unindented lines.
    pub fn render_wrapped(&self, text: &str, indent: usize) -> String {
        text.lines()
            .flat_map(|line| wrap_line(line, self.width, indent))
            .collect::<Vec<_>>()
            .join(&self.new_line)
    }

    fn arg_name_of<'o>(&'o self, option: &'o OptionSpec) -> &'o str {
        option.arg_name.as_deref().unwrap_or(&self.arg_name)
    }

    fn ordered<'o>(&self, options: &'o [OptionSpec]) -> Vec<&'o OptionSpec> {
        let mut ordered: Vec<&OptionSpec> = options.iter().collect();
        if self.sort {
            ordered.sort_by_key(|option| option.key().to_lowercase());
        }
        ordered
    }

    fn push_line(&self, out: &mut String, text: &str) {
        out.push_str(text);
        out.push_str(&self.new_line);
    }
}

/// Breaks one line at the last space that fits, or mid-word when a word
/// is longer than the available width.
fn wrap_line(text: &str, width: usize, indent: usize) -> Vec<String> {
    let width = width.max(1);
    let indent = if indent >= width { 1 } else { indent };
    let indent = indent.min(width - 1);

    let mut lines = Vec::new();
    let mut rest = text.trim_end();
    let mut pad = 0;

    loop {
        let available = width - pad;
        if rest.chars().count() <= available {
            lines.push(format!("{}{rest}", " ".repeat(pad)));
            return lines;
        }

        let bounds: Vec<(usize, char)> = rest.char_indices().take(available + 1).collect();
        let split = bounds
            .iter()
            .rev()
            .find(|&&(index, ch)| ch == ' ' && index > 0)
            .map_or(bounds[available].0, |&(index, _)| index);

        let (head, tail) = rest.split_at(split);
        lines.push(format!("{}{}", " ".repeat(pad), head.trim_end()));
        rest = tail.trim_start();
        pad = indent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Options {
        Options::new()
            .with_option(OptionSpec::short("b").with_arg().required())
            .with_option(OptionSpec::short("a"))
            .with_option(OptionSpec::long("verbose"))
            .with_group(
                OptionGroup::new()
                    .with_option(OptionSpec::short("y"))
                    .with_option(OptionSpec::short("x")),
            )
    }

    #[test]
    fn test_generated_usage() {
        let formatter = HelpFormatter::default();
        assert_eq!(
            formatter.render_usage("app", &options()),
            "usage: app [-a] -b <arg> [--verbose] [-x | -y]"
        );
    }

    #[test]
    fn test_usage_in_declaration_order() {
        let formatter = HelpFormatter::default().sorted(false);
        assert_eq!(
            formatter.render_usage("app", &options()),
            "usage: app -b <arg> [-a] [--verbose] [-y | -x]"
        );
    }

    #[test]
    fn test_required_group_is_not_bracketed() {
        let options = Options::new().with_group(
            OptionGroup::new()
                .with_option(OptionSpec::short("x"))
                .with_option(OptionSpec::long("why").with_arg_name("reason").with_arg())
                .required(),
        );
        assert_eq!(
            HelpFormatter::default().render_usage("app", &options),
            "usage: app --why <reason> | -x"
        );
    }

    #[test]
    fn test_option_listing_aligns_descriptions() {
        let options = Options::new()
            .with_option(OptionSpec::short("a").with_long("all").with_description("do all"))
            .with_option(OptionSpec::short("b").with_arg().with_description("file to use"))
            .with_option(OptionSpec::long("verbose").with_description("be chatty"));

        let listing = HelpFormatter::default().render_options(&options);
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(
            lines,
            vec![
                " -a,--all       do all",
                " -b <arg>       file to use",
                "    --verbose   be chatty",
            ]
        );
    }

    #[test]
    fn test_long_descriptions_wrap_under_column() {
        let options = Options::new()
            .with_option(OptionSpec::short("a").with_description("one two three four"));

        let listing = HelpFormatter::default()
            .with_width(16)
            .render_options(&options);
        assert_eq!(listing, " -a   one two\n      three four");
    }

    #[test]
    fn test_wrap_uses_hanging_indent() {
        assert_eq!(
            wrap_line("the quick brown fox jumps over the lazy dog", 20, 4),
            vec!["the quick brown fox", "    jumps over the", "    lazy dog"]
        );
    }

    #[test]
    fn test_wrap_chops_long_words() {
        assert_eq!(wrap_line("abcdefgh", 5, 0), vec!["abcde", "fgh"]);
    }

    #[test]
    fn test_wrap_at_width_one_terminates() {
        assert_eq!(wrap_line("ab cd", 1, 3), vec!["a", "b", "c", "d"]);

        let help = HelpFormatter::new()
            .with_width(1)
            .render_options(&options());
        assert!(!help.is_empty());
    }

    #[test]
    fn test_explicit_syntax_indents_after_program_name() {
        let formatter = HelpFormatter::default().with_width(20);
        assert_eq!(
            formatter.render_syntax("app [options] FILE..."),
            "usage: app [options]\n           FILE..."
        );
    }

    #[test]
    fn test_render_help_sections() {
        let options = Options::new().with_option(OptionSpec::short("a").with_description("flag"));
        let help = HelpFormatter::default()
            .render_help("app [options]", Some("Header text"), &options, Some("Footer"), false)
            .unwrap();

        assert_eq!(help, "usage: app [options]\nHeader text\n -a   flag\nFooter\n");
    }

    #[test]
    fn test_empty_syntax_is_rejected() {
        let err = HelpFormatter::default()
            .render_help("  ", None, &Options::new(), None, true)
            .unwrap_err();
        assert_eq!(err, HelpError::EmptySyntax);
    }
}
