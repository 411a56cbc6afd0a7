use crate::commands::{current_config, CmdMessage, CmdResult};
use crate::error::{DocgenError, Result};
use crate::handler::DirectoryHandler;
use crate::provider::{CompanyForm, CompanyProfileProvider, DataSource, GenerationRequest};
use crate::store::SettingsStore;
use std::fs;
use std::path::Path;

/// Which shape the input file has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Form,
    Json,
}

/// Reads company data from a JSON file, either a form submission or free-form JSON.
pub fn load_source(kind: SourceKind, path: &Path) -> Result<DataSource> {
    let content = fs::read_to_string(path)?;
    Ok(match kind {
        SourceKind::Form => {
            let form: CompanyForm = serde_json::from_str(&content)?;
            DataSource::Form(form)
        }
        SourceKind::Json => DataSource::Json(serde_json::from_str(&content)?),
    })
}

/// Assembles the generation request for a company profile.
///
/// The template must exist in the configured template directory and pass the structural
/// check; the request is returned for the external generator to render.
pub fn run<S: SettingsStore>(
    store: &S,
    handler: &DirectoryHandler,
    source: DataSource,
) -> Result<CmdResult> {
    let config = current_config(store, handler.validator().uploads_root())?;
    let provider = CompanyProfileProvider::new(source, config);
    let request = GenerationRequest::from_provider(&provider)?;

    if !handler.validate_template_file(&request.template_path) {
        return Err(DocgenError::InvalidTemplate(request.template_path));
    }

    tracing::info!(
        template = %request.template_path.display(),
        output = %request.output_filename,
        format = %request.output_format,
        "generation request prepared"
    );
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Prepared {}.{} from {}",
        request.output_filename,
        request.output_format,
        request.template_path.display()
    )));
    Ok(result.with_generation(request))
}
