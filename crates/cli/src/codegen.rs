//! Config-types generator.
//!
//! Turns the TOML modules of a configuration directory into `Deserialize`
//! structs: one per module and nested table, plus a root `Config`.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use kaname_core::{ConfigError, read_config_modules};
use thiserror::Error;
use toml::{Table, Value};

pub(crate) const DEFAULT_OUTPUT: &str = "src/generated/config.rs";

const HEADER: &str = "// @generated by `kaname config:types`. Do not edit.\n\nuse serde::Deserialize;\n";

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub",
    "ref", "return", "static", "struct", "trait", "true", "type", "unsafe", "use", "where", "while",
    "abstract", "become", "box", "do", "final", "gen", "macro", "override", "priv", "try", "typeof",
    "unsized", "virtual", "yield",
];

#[derive(Debug, Error)]
pub(crate) enum CodegenError {
    #[error("config directory not found: {}", .0.display())]
    MissingDir(PathBuf),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

struct Field {
    rust_name: String,
    key: String,
    ty: String,
}

struct StructDef {
    name: String,
    fields: Vec<Field>,
}

#[derive(Default)]
struct Generator {
    structs: Vec<StructDef>,
    used: BTreeSet<String>,
}

impl Generator {
    /// Reserves a struct name, suffixing a counter on collision.
    fn reserve(&mut self, base: &str) -> String {
        let mut name = base.to_owned();
        let mut n = 2;
        while !self.used.insert(name.clone()) {
            name = format!("{base}{n}");
            n += 1;
        }
        name
    }

    fn table(&mut self, base: &str, table: &Table) -> String {
        let name = self.reserve(base);
        let slot = self.structs.len();
        self.structs.push(StructDef { name: name.clone(), fields: Vec::new() });

        let mut fields = Vec::with_capacity(table.len());
        let mut idents = BTreeSet::new();
        for (key, value) in table {
            let ty = self.value_type(&format!("{name}{}", pascal_case(key)), value);
            let base = field_ident(key);
            let mut rust_name = base.clone();
            let mut n = 2;
            while !idents.insert(rust_name.clone()) {
                rust_name = format!("{base}_{n}");
                n += 1;
            }
            fields.push(Field { rust_name, key: key.clone(), ty });
        }
        if let Some(def) = self.structs.get_mut(slot) {
            def.fields = fields;
        }
        name
    }

    fn value_type(&mut self, base: &str, value: &Value) -> String {
        match value {
            Value::String(_) => "String".to_owned(),
            Value::Integer(_) => "i64".to_owned(),
            Value::Float(_) => "f64".to_owned(),
            Value::Boolean(_) => "bool".to_owned(),
            Value::Datetime(_) => "toml::value::Datetime".to_owned(),
            Value::Table(table) => self.table(base, table),
            Value::Array(items) => format!("Vec<{}>", self.element_type(base, items)),
        }
    }

    fn element_type(&mut self, base: &str, items: &[Value]) -> String {
        let Some(first) = items.first() else {
            return "toml::Value".to_owned();
        };
        if items.iter().any(|item| item.type_str() != first.type_str()) {
            return "toml::Value".to_owned();
        }
        self.value_type(&format!("{base}Item"), first)
    }

    fn render(&self, root: &[(String, String, String)]) -> String {
        let mut out = String::from(HEADER);
        out.push_str("\n#[derive(Debug, Clone, Deserialize)]\npub struct Config {\n");
        for (key, rust_name, ty) in root {
            push_field(&mut out, key, rust_name, ty);
        }
        out.push_str("}\n");
        for def in &self.structs {
            let _ = write!(out, "\n#[derive(Debug, Clone, Deserialize)]\npub struct {} {{\n", def.name);
            for field in &def.fields {
                push_field(&mut out, &field.key, &field.rust_name, &field.ty);
            }
            out.push_str("}\n");
        }
        out
    }
}

fn push_field(out: &mut String, key: &str, rust_name: &str, ty: &str) {
    if rust_name.trim_start_matches("r#") != key {
        let _ = writeln!(out, "    #[serde(rename = {key:?})]");
    }
    let _ = writeln!(out, "    pub {rust_name}: {ty},");
}

/// Renders the module list as Rust source.
pub(crate) fn generate(modules: &[(String, Table)]) -> String {
    let mut generator = Generator::default();
    generator.used.insert("Config".to_owned());
    let root: Vec<(String, String, String)> = modules
        .iter()
        .map(|(name, table)| {
            let ty = generator.table(&format!("{}Config", pascal_case(name)), table);
            (name.clone(), field_ident(name), ty)
        })
        .collect();
    generator.render(&root)
}

/// Reads `dir`, generates the types and writes them to `out`.
///
/// The file is written to a sibling temp file first and renamed into place,
/// so a failure never leaves partial output.
pub(crate) fn generate_to(dir: &Path, out: &Path) -> Result<usize, CodegenError> {
    if !dir.is_dir() {
        return Err(CodegenError::MissingDir(dir.to_owned()));
    }
    let modules = read_config_modules(dir)?;
    let source = generate(&modules);
    write_atomic(out, &source)?;
    Ok(modules.len())
}

fn write_atomic(path: &Path, contents: &str) -> Result<(), CodegenError> {
    let write_err = |source| CodegenError::Write { path: path.to_owned(), source };
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_owned(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent).map_err(write_err)?;
    let mut file = tempfile::NamedTempFile::new_in(&parent).map_err(write_err)?;
    file.write_all(contents.as_bytes()).map_err(write_err)?;
    file.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

/// `snake_case` identifier for a TOML key.
///
/// Keywords become raw identifiers; `self`, `super`, `crate` and `_` get a suffix.
fn field_ident(key: &str) -> String {
    let mut ident = String::with_capacity(key.len() + 4);
    let mut prev_lower = false;
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            if prev_lower {
                ident.push('_');
            }
            ident.push(ch.to_ascii_lowercase());
            prev_lower = false;
        } else if ch.is_ascii_alphanumeric() {
            ident.push(ch);
            prev_lower = true;
        } else {
            ident.push('_');
            prev_lower = false;
        }
    }
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if ident == "_" {
        return "_field".to_owned();
    }
    // Cannot be raw identifiers.
    if matches!(ident.as_str(), "self" | "super" | "crate") {
        ident.push('_');
    } else if KEYWORDS.contains(&ident.as_str()) {
        ident.insert_str(0, "r#");
    }
    ident
}

fn pascal_case(key: &str) -> String {
    let mut out = String::new();
    for part in key.split(|c: char| !c.is_ascii_alphanumeric()).filter(|p| !p.is_empty()) {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.extend(chars);
        }
    }
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, 'T');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modules(sources: &[(&str, &str)]) -> Vec<(String, Table)> {
        sources.iter().map(|(name, src)| ((*name).to_owned(), src.parse::<Table>().unwrap())).collect()
    }

    #[test]
    fn test_scalar_types() {
        let out = generate(&modules(&[(
            "app",
            "name = \"kaname\"\nport = 3000\nratio = 0.5\ndebug = true\nstarted = 2026-01-01T00:00:00Z\n",
        )]));
        assert!(out.starts_with("// @generated"));
        assert!(out.contains("pub struct Config {\n    pub app: AppConfig,\n}"));
        assert!(out.contains("    pub name: String,\n"));
        assert!(out.contains("    pub port: i64,\n"));
        assert!(out.contains("    pub ratio: f64,\n"));
        assert!(out.contains("    pub debug: bool,\n"));
        assert!(out.contains("    pub started: toml::value::Datetime,\n"));
    }

    #[test]
    fn test_nested_tables_and_arrays() {
        let out = generate(&modules(&[(
            "database",
            "hosts = [\"a\", \"b\"]\nmixed = [1, \"x\"]\nempty = []\n[pool]\nsize = 4\n[[replicas]]\nurl = \"x\"\n",
        )]));
        assert!(out.contains("    pub hosts: Vec<String>,\n"));
        assert!(out.contains("    pub mixed: Vec<toml::Value>,\n"));
        assert!(out.contains("    pub empty: Vec<toml::Value>,\n"));
        assert!(out.contains("    pub pool: DatabaseConfigPool,\n"));
        assert!(out.contains("pub struct DatabaseConfigPool {\n    pub size: i64,\n}"));
        assert!(out.contains("    pub replicas: Vec<DatabaseConfigReplicasItem>,\n"));
    }

    #[test]
    fn test_keys_are_sanitized_with_rename() {
        let out = generate(&modules(&[("my-app", "jwtSecret = \"s\"\n\"2fa\" = true\ntype = \"x\"\n")]));
        assert!(out.contains("    #[serde(rename = \"my-app\")]\n    pub my_app: MyAppConfig,\n"));
        assert!(out.contains("    #[serde(rename = \"jwtSecret\")]\n    pub jwt_secret: String,\n"));
        assert!(out.contains("    #[serde(rename = \"2fa\")]\n    pub _2fa: bool,\n"));
        assert!(out.contains("    pub r#type: String,\n"));
        assert!(!out.contains("rename = \"type\""));
    }

    #[test]
    fn test_reserved_keys_get_suffixed_idents() {
        let out = generate(&modules(&[("a", "self = 1\ncrate = 2\nsuper = 3\n\"_\" = 4\nSelf = 5\n\"\" = 6\n")]));
        // Keys sort as "", "Self", "_", "crate", "self", "super"; later collisions get a suffix.
        assert!(out.contains("    #[serde(rename = \"Self\")]\n    pub self_: i64,\n"));
        assert!(out.contains("    #[serde(rename = \"crate\")]\n    pub crate_: i64,\n"));
        assert!(out.contains("    #[serde(rename = \"super\")]\n    pub super_: i64,\n"));
        assert!(out.contains("    #[serde(rename = \"\")]\n    pub _field: i64,\n"));
        assert!(out.contains("    #[serde(rename = \"self\")]\n    pub self__2: i64,\n"));
        assert!(out.contains("    #[serde(rename = \"_\")]\n    pub _field_2: i64,\n"));
        for bad in ["pub self:", "pub _:", "pub r#crate:", "pub r#self:", "pub r#super:"] {
            assert!(!out.contains(bad), "generated `{bad}`");
        }
    }

    #[test]
    fn test_struct_name_collision_gets_suffix() {
        let out = generate(&modules(&[("a", "[b_c]\nx = 1\n[b-c]\ny = 2\n")]));
        assert!(out.contains("pub struct AConfigBC {"));
        assert!(out.contains("pub struct AConfigBC2 {"));
        assert!(out.contains("    #[serde(rename = \"b-c\")]\n    pub b_c: AConfigBC,\n"));
        assert!(out.contains("    #[serde(rename = \"b_c\")]\n    pub b_c_2: AConfigBC2,\n"));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let input = modules(&[("app", "b = 1\na = 2\n"), ("auth", "secret = \"x\"\n")]);
        assert_eq!(generate(&input), generate(&input));
    }

    #[test]
    fn test_generate_to_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.toml"), "name = \"x\"\n").unwrap();
        let out = dir.path().join("gen/config.rs");

        assert_eq!(generate_to(dir.path(), &out).unwrap(), 1);
        assert!(std::fs::read_to_string(&out).unwrap().contains("pub app: AppConfig"));
    }

    #[test]
    fn test_generate_to_fails_without_output_on_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.toml"), "name = \n").unwrap();
        let out = dir.path().join("config.rs");

        let err = generate_to(dir.path(), &out).unwrap_err();
        assert!(matches!(err, CodegenError::Config(ConfigError::Parse { .. })));
        assert!(!out.exists());
    }

    #[test]
    fn test_generate_to_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = generate_to(&dir.path().join("nope"), &dir.path().join("out.rs")).unwrap_err();
        assert!(matches!(err, CodegenError::MissingDir(_)));
    }
}
