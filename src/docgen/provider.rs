//! # Document Providers
//!
//! Rendering is done by an external generator. This module only assembles what the
//! generator consumes: a template path, an output name and format, a scratch directory
//! and a flat key/value map for placeholder substitution.
//!
//! Company data comes from one of two sources, modelled as the [`DataSource`] sum type.
//! Both variants produce the same key set so templates need not care where data came
//! from. Values such as `${date:...}` and `${user:...}` are placeholders resolved by the
//! generator, not by this crate.

use crate::error::{DocgenError, Result};
use crate::model::{DirectoryConfig, OutputFormat};
use crate::paths::is_writable;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

pub const COMPANY_PROFILE_TEMPLATE: &str = "company-profile-template.docx";
const PROFILE_TEMP_SUBDIR: &str = "company-profiles";

/// What the external generator needs. Produced by any [`DocumentProvider`].
pub trait DocumentProvider {
    fn template_path(&self) -> Result<PathBuf>;
    fn output_filename(&self) -> String;
    fn output_format(&self) -> OutputFormat;
    fn temp_dir(&self) -> Result<PathBuf>;
    fn data(&self) -> BTreeMap<String, String>;
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub phone: String,
    pub email: String,
    pub website: String,
}

/// List fields are textarea input: one item per line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Business {
    pub main_services: String,
    pub industries: String,
    pub employee_count: String,
    pub office_locations: String,
}

/// Raw admin form submission.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CompanyForm {
    pub company_name: String,
    pub legal_name: String,
    pub tagline: String,
    pub address: Address,
    pub contact: Contact,
    pub business: Business,
}

#[derive(Debug, Clone)]
pub enum DataSource {
    Form(CompanyForm),
    Json(Value),
}

impl DataSource {
    pub fn identifier(&self) -> &'static str {
        match self {
            DataSource::Form(_) => "form",
            DataSource::Json(_) => "json",
        }
    }

    pub fn company_name(&self) -> String {
        match self {
            DataSource::Form(form) => sanitize_text(&form.company_name),
            DataSource::Json(json) => text_at(json, &["company_name"]),
        }
    }

    pub fn to_template_data(&self, generated_at: DateTime<Local>) -> BTreeMap<String, String> {
        let mut data = match self {
            DataSource::Form(form) => form_data(form),
            DataSource::Json(json) => json_data(json),
        };
        data.insert(
            "generated_date".into(),
            format!(
                "${{date:{}:j F Y H:i}}",
                generated_at.format("%Y-%m-%d %H:%M:%S")
            ),
        );
        data.insert("generated_by".into(), "${user:display_name}".into());
        data.insert("generated_by_email".into(), "${user:user_email}".into());
        data.insert(
            "source".into(),
            match self {
                DataSource::Form(_) => "Form Data".into(),
                DataSource::Json(_) => "JSON Data".into(),
            },
        );
        data
    }
}

fn form_data(form: &CompanyForm) -> BTreeMap<String, String> {
    let a = &form.address;
    let mut data = BTreeMap::new();
    data.insert("company_name".into(), sanitize_text(&form.company_name));
    data.insert("legal_name".into(), sanitize_text(&form.legal_name));
    data.insert("tagline".into(), sanitize_text(&form.tagline));
    data.insert(
        "address".into(),
        format_address(
            &sanitize_text(&a.street),
            &sanitize_text(&a.city),
            &sanitize_text(&a.province),
            &sanitize_text(&a.postal_code),
            &sanitize_text(&a.country),
        ),
    );
    data.insert("phone".into(), sanitize_text(&form.contact.phone));
    data.insert("email".into(), sanitize_email(&form.contact.email));
    data.insert("website".into(), sanitize_url(&form.contact.website));
    data.insert(
        "main_services".into(),
        bullet_points(&textarea_lines(&form.business.main_services)),
    );
    data.insert(
        "industries".into(),
        bullet_points(&textarea_lines(&form.business.industries)),
    );
    data.insert(
        "employee_count".into(),
        sanitize_text(&form.business.employee_count),
    );
    data.insert(
        "office_locations".into(),
        bullet_points(&textarea_lines(&form.business.office_locations)),
    );
    data
}

fn json_data(json: &Value) -> BTreeMap<String, String> {
    let mut data = BTreeMap::new();
    if json.as_object().map_or(true, |o| o.is_empty()) {
        return data;
    }

    let t = |path: &[&str]| text_at(json, path);
    let list = |path: &[&str]| bullet_points(&list_at(json, path));

    data.insert("company_name".into(), t(&["company_name"]));
    data.insert("legal_name".into(), t(&["legal_name"]));
    data.insert("tagline".into(), t(&["tagline"]));
    data.insert(
        "address".into(),
        format_address(
            &t(&["address", "street"]),
            &t(&["address", "city"]),
            &t(&["address", "province"]),
            &t(&["address", "postal_code"]),
            &t(&["address", "country"]),
        ),
    );
    data.insert("phone".into(), t(&["contact", "phone"]));
    data.insert("email".into(), t(&["contact", "email"]));
    data.insert("website".into(), t(&["contact", "website"]));
    data.insert("company_id".into(), t(&["registration", "company_id"]));
    data.insert("tax_id".into(), t(&["registration", "tax_id"]));
    let established = t(&["registration", "established_date"]);
    data.insert(
        "established_date".into(),
        if established.is_empty() {
            String::new()
        } else {
            format!("${{date:{}:j F Y}}", established)
        },
    );
    data.insert("vision".into(), t(&["profile", "vision"]));
    data.insert("mission".into(), list(&["profile", "mission"]));
    data.insert("values".into(), list(&["profile", "values"]));
    data.insert("main_services".into(), list(&["business", "main_services"]));
    data.insert("industries".into(), list(&["business", "industries"]));
    data.insert("employee_count".into(), t(&["business", "employee_count"]));
    data.insert(
        "office_locations".into(),
        list(&["business", "office_locations"]),
    );
    data.insert(
        "certifications".into(),
        certifications(json.get("certifications")),
    );
    data
}

fn lookup<'a>(json: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(json, |v, key| v.get(key))
}

fn text_at(json: &Value, path: &[&str]) -> String {
    match lookup(json, path) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn list_at(json: &Value, path: &[&str]) -> Vec<String> {
    match lookup(json, path) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn certifications(value: Option<&Value>) -> String {
    let Some(Value::Array(certs)) = value else {
        return String::new();
    };
    certs
        .iter()
        .map(|cert| {
            let valid_until = text_at(cert, &["valid_until"]);
            format!(
                "• {} - {} (Valid until: {})",
                text_at(cert, &["name"]),
                text_at(cert, &["description"]),
                if valid_until.is_empty() {
                    String::new()
                } else {
                    format!("${{date:{}:j F Y}}", valid_until)
                }
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_address(street: &str, city: &str, province: &str, postal: &str, country: &str) -> String {
    format!("{}\n{}, {} {}\n{}", street, city, province, postal, country)
}

pub fn bullet_points(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("• {}", item.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn textarea_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(sanitize_text)
        .filter(|l| !l.is_empty())
        .collect()
}

/// Strips tags, folds whitespace runs to single spaces and trims.
pub fn sanitize_text(input: &str) -> String {
    let mut stripped = String::with_capacity(input.len());
    let mut in_tag = false;
    for c in input.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => stripped.push(c),
            _ => {}
        }
    }
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn sanitize_email(input: &str) -> String {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || "@.-_+".contains(*c))
        .collect();
    match cleaned.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => cleaned,
        _ => String::new(),
    }
}

fn sanitize_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return String::new();
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else if trimmed.contains("://") {
        String::new()
    } else {
        format!("http://{}", trimmed)
    }
}

/// Lowercase, ASCII alphanumerics separated by single dashes.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

pub struct CompanyProfileProvider {
    source: DataSource,
    config: DirectoryConfig,
    generated_at: DateTime<Local>,
}

impl CompanyProfileProvider {
    pub fn new(source: DataSource, config: DirectoryConfig) -> Self {
        Self {
            source,
            config,
            generated_at: Local::now(),
        }
    }

    pub fn at(mut self, generated_at: DateTime<Local>) -> Self {
        self.generated_at = generated_at;
        self
    }
}

impl DocumentProvider for CompanyProfileProvider {
    fn template_path(&self) -> Result<PathBuf> {
        if self.config.template_dir.as_os_str().is_empty() {
            return Err(DocgenError::NotConfigured("Template directory"));
        }
        let path = self.config.template_dir.join(COMPANY_PROFILE_TEMPLATE);
        if !path.is_file() {
            return Err(DocgenError::TemplateNotFound(path));
        }
        Ok(path)
    }

    fn output_filename(&self) -> String {
        let company = slugify(&self.source.company_name());
        let company = if company.is_empty() {
            "company".to_string()
        } else {
            company
        };
        format!(
            "{}-profile-{}-{}",
            company,
            self.source.identifier(),
            self.generated_at.format("%Y%m%d-%H%M%S")
        )
    }

    fn output_format(&self) -> OutputFormat {
        self.config.output_format
    }

    fn temp_dir(&self) -> Result<PathBuf> {
        if self.config.temp_dir.as_os_str().is_empty() {
            return Err(DocgenError::NotConfigured("Temporary directory"));
        }
        let dir = self.config.temp_dir.join(PROFILE_TEMP_SUBDIR);
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|source| DocgenError::CreateFailed {
                path: dir.clone(),
                source,
            })?;
        }
        if !is_writable(&dir) {
            return Err(DocgenError::NotWritable(format!(
                "Temporary directory is not writable: {}",
                dir.display()
            )));
        }
        Ok(dir)
    }

    fn data(&self) -> BTreeMap<String, String> {
        self.source.to_template_data(self.generated_at)
    }
}

/// Everything the external generator is handed for one document.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub template_path: PathBuf,
    pub output_filename: String,
    pub output_format: OutputFormat,
    pub temp_dir: PathBuf,
    pub data: BTreeMap<String, String>,
}

impl GenerationRequest {
    pub fn from_provider(provider: &dyn DocumentProvider) -> Result<Self> {
        Ok(Self {
            template_path: provider.template_path()?,
            output_filename: provider.output_filename(),
            output_format: provider.output_format(),
            temp_dir: provider.temp_dir()?,
            data: provider.data(),
        })
    }
}
