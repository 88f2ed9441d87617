use indexmap::IndexMap;
use std::collections::HashSet;

/// The token which ends named argument scanning.
pub const SEPARATOR: &str = "--";

/// Named argument assignments, keyed by the name without leading hyphens.
///
/// A value of `None` means the argument was mentioned without a value.
/// Names keep the position of their first mention; repeated mentions overwrite the value.
pub type NamedAssignments = IndexMap<String, Option<String>>;

/// The result of tokenizing a command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokenized {
    /// The named argument assignments.
    pub named: NamedAssignments,
    /// The positional values, in input order.
    pub positional: Vec<String>,
    /// The first input token, if it was a positional value.
    pub first_positional: Option<String>,
}

/// Tokenize a command line into named assignments and positional values.
///
/// Each token is decided in turn, looking ahead at most one token:
/// * `--` ends named argument scanning; it and every following token are positional.
/// * `--name=value` assigns `value` (which may be empty) to `name`.
/// * `--name` takes the next token as its value, unless that token starts with `-` or `name` is in `valueless`.
/// * `-abc` assigns no value to `a` and `b`; the final `c` follows the `--name` rule.
/// * Anything else is positional.
///
/// `valueless` must contain both the canonical names and the aliases of all valueless arguments.
///
/// ### Example
/// ```
/// # use subcommander_engine as subcommander;
/// use std::collections::HashSet;
/// use subcommander::tokenize;
///
/// let tokenized = tokenize(&["-nPNi", "eth0", "out"], &HashSet::default());
///
/// assert_eq!(tokenized.named.get("n"), Some(&None));
/// assert_eq!(tokenized.named.get("i"), Some(&Some("eth0".to_string())));
/// assert_eq!(tokenized.positional, vec!["out".to_string()]);
/// ```
pub fn tokenize(tokens: &[&str], valueless: &HashSet<String>) -> Tokenized {
    let mut tokenized = Tokenized::default();
    let mut index = 0;

    while index < tokens.len() {
        let token = tokens[index];
        let lookahead = tokens.get(index + 1).copied();

        if token == SEPARATOR {
            tokenized
                .positional
                .extend(tokens[index..].iter().map(|t| t.to_string()));
            break;
        }

        // Find a 'long' flag, such as:
        //  --name=..
        //  --name ..
        //  --name
        if let Some(long) = token.strip_prefix("--") {
            match long.split_once('=') {
                Some((name, value)) if !name.is_empty() => {
                    tokenized
                        .named
                        .insert(name.to_string(), Some(value.to_string()));
                    index += 1;
                    continue;
                }
                Some(_) => {
                    // `--=..` has no name, so it is data.
                }
                None => {
                    index += tokenized.assign(long, lookahead, valueless);
                    continue;
                }
            }
        }
        // Find compound 'short' flags, such as:
        //  -i ..
        //  -nPNi ..
        else if let Some(shorts) = token.strip_prefix('-') {
            if !shorts.is_empty() && shorts.chars().all(is_word) {
                let mut names: Vec<String> = shorts.chars().map(String::from).collect();
                let active = names
                    .pop()
                    .expect("internal error - short flags must be non-empty");

                for name in names {
                    tokenized.named.insert(name, None);
                }

                index += tokenized.assign(&active, lookahead, valueless);
                continue;
            }
        }

        if index == 0 {
            tokenized.first_positional.replace(token.to_string());
        }

        tokenized.positional.push(token.to_string());
        index += 1;
    }

    tokenized
}

impl Tokenized {
    /// Assign the named argument, returning the number of tokens consumed.
    fn assign(&mut self, name: &str, lookahead: Option<&str>, valueless: &HashSet<String>) -> usize {
        let next_is_flag = lookahead.map_or(false, |next| next.starts_with('-'));

        if next_is_flag || valueless.contains(name) {
            self.named.insert(name.to_string(), None);
            return 1;
        }

        match lookahead {
            Some(value) => {
                self.named.insert(name.to_string(), Some(value.to_string()));
                2
            }
            None => {
                self.named.insert(name.to_string(), None);
                1
            }
        }
    }
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
