use std::fmt;
use std::path::Path;

/// Declarative list of runtime dependencies, one specifier per line.
///
/// The manifest is parsed once and never mutated afterwards; the copy placed
/// in the build context is reproduced from [`Manifest`]'s `Display` impl and
/// preserves declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    specs: Vec<DependencySpec>,
}

/// A single dependency declaration: name, optional extras, optional version
/// constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySpec {
    pub name: String,
    pub extras: Vec<String>,
    pub constraint: Option<Constraint>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub op: ConstraintOp,
    pub version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    Eq,
    Ge,
    Le,
    Compatible,
    Ne,
    Gt,
    Lt,
}

impl ConstraintOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Compatible => "~=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
        }
    }
}

// Two-character operators must be tried before ">" and "<".
const OPERATORS: &[(&str, ConstraintOp)] = &[
    ("==", ConstraintOp::Eq),
    (">=", ConstraintOp::Ge),
    ("<=", ConstraintOp::Le),
    ("~=", ConstraintOp::Compatible),
    ("!=", ConstraintOp::Ne),
    (">", ConstraintOp::Gt),
    ("<", ConstraintOp::Lt),
];

impl Manifest {
    /// Parse manifest text: one specifier per line, `#` comments and blank
    /// lines skipped. Any malformed line is fatal — there is no partial
    /// manifest.
    pub fn parse(input: &str) -> crate::Result<Self> {
        let mut specs = Vec::new();

        for (idx, raw) in input.lines().enumerate() {
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }

            let spec =
                DependencySpec::parse(line).map_err(|reason| crate::Error::ManifestParse {
                    line: idx + 1,
                    text: raw.trim().to_owned(),
                    reason,
                })?;
            specs.push(spec);
        }

        tracing::debug!(count = specs.len(), "parsed manifest");
        Ok(Self { specs })
    }

    /// Load and parse a manifest file.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| crate::Error::ManifestRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// An empty manifest is valid: the pipeline still runs every stage, the
    /// dependency-install step is simply a no-op.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn specs(&self) -> &[DependencySpec] {
        &self.specs
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for spec in &self.specs {
            writeln!(f, "{spec}")?;
        }
        Ok(())
    }
}

impl DependencySpec {
    /// Parse a single trimmed, comment-free specifier.
    fn parse(line: &str) -> Result<Self, &'static str> {
        // Split off the version constraint first.
        let (head, constraint) = match OPERATORS
            .iter()
            .find_map(|(op_str, op)| line.find(op_str).map(|pos| (pos, *op_str, *op)))
        {
            Some((pos, op_str, op)) => {
                let version = line[pos + op_str.len()..].trim();
                if version.is_empty() {
                    return Err("missing version after operator");
                }
                if !version
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '*' | '+' | '-' | '_'))
                {
                    return Err("invalid version");
                }
                (
                    line[..pos].trim_end(),
                    Some(Constraint {
                        op,
                        version: version.to_owned(),
                    }),
                )
            }
            None => (line, None),
        };

        // Then the optional extras bracket.
        let (name, extras) = match head.find('[') {
            Some(open) => {
                let Some(rest) = head[open..].strip_prefix('[') else {
                    return Err("malformed extras");
                };
                let Some(close) = rest.find(']') else {
                    return Err("unclosed extras bracket");
                };
                if !rest[close + 1..].trim().is_empty() {
                    return Err("trailing text after extras");
                }
                let extras: Vec<String> = rest[..close]
                    .split(',')
                    .map(|e| e.trim().to_owned())
                    .collect();
                if extras.iter().any(|e| !is_valid_name(e)) {
                    return Err("invalid extra name");
                }
                (head[..open].trim_end(), extras)
            }
            None => (head, Vec::new()),
        };

        if !is_valid_name(name) {
            return Err("invalid package name");
        }

        Ok(Self {
            name: name.to_owned(),
            extras,
            constraint,
        })
    }
}

impl fmt::Display for DependencySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.extras.is_empty() {
            write!(f, "[{}]", self.extras.join(","))?;
        }
        if let Some(c) = &self.constraint {
            write!(f, "{}{}", c.op.as_str(), c.version)?;
        }
        Ok(())
    }
}

/// Package names: alphanumeric at both ends, `.`/`_`/`-` allowed inside.
fn is_valid_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    if bytes.is_empty() {
        return false;
    }
    if !bytes[0].is_ascii_alphanumeric() || !bytes[bytes.len() - 1].is_ascii_alphanumeric() {
        return false;
    }
    bytes
        .iter()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'))
}

/// Strip a `#` comment: either a full-line comment or one preceded by
/// whitespace (so `package#egg` style names are left alone).
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(0) => "",
        Some(pos) if line[..pos].ends_with(char::is_whitespace) => &line[..pos],
        _ => line,
    }
}
