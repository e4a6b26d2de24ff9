use handlebars::{html_escape, Handlebars};
use include_dir::{include_dir, Dir};
use serde::Serialize;
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::TypeCatalog;
use crate::config::SiteConfig;
use crate::error::{Error, Result};
use crate::highlight::Highlighter;
use crate::model::{ApiEndpoint, Dataset, DocItem, FieldSpec, TypeDefinition};
use crate::preview::{
    anchor_id, render_label, render_preview, ExampleView, PreviewBuilder, ReturnsView,
};
use crate::resolver::PrimitiveSet;
use crate::typeref::interface_notation;

static SITE_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/site");

const SOURCE_LANGUAGE: &str = "py";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Api,
    Types,
    Docs,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Home, Page::Api, Page::Types, Page::Docs];

    pub fn file_name(self) -> &'static str {
        match self {
            Page::Home => "index.html",
            Page::Api => "api.html",
            Page::Types => "types.html",
            Page::Docs => "docs.html",
        }
    }

    fn section(self) -> Option<&'static str> {
        match self {
            Page::Home => None,
            Page::Api => Some("api"),
            Page::Types => Some("types"),
            Page::Docs => Some("docs"),
        }
    }

    fn template(self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Api => "api",
            Page::Types => "types",
            Page::Docs => "docs",
        }
    }
}

/// Files written by one generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    pub files: Vec<PathBuf>,
    pub api: usize,
    pub docs: usize,
    pub types: usize,
}

/// Renders a dataset into a static site.
pub struct SiteGenerator {
    dataset: Dataset,
    config: SiteConfig,
    catalog: TypeCatalog,
    primitives: PrimitiveSet,
    highlighter: Highlighter,
    templates: Handlebars<'static>,
}

#[derive(Serialize)]
struct NavLink {
    href: &'static str,
    label: String,
    active: bool,
}

#[derive(Serialize)]
struct FieldRow {
    name: String,
    emoji: Option<String>,
    label_html: String,
    description: String,
}

#[derive(Serialize)]
struct TagGroup<T> {
    tag: String,
    display: String,
    items: Vec<T>,
}

#[derive(Serialize)]
struct EndpointCard {
    anchor: String,
    function_name: String,
    endpoint: String,
    method: String,
    method_class: String,
    status: String,
    tag: String,
    version: String,
    last_updated: String,
    description: String,
    args: Vec<FieldRow>,
    json_body_html: Option<String>,
    responses: Vec<ResponseRow>,
    source_html: Option<String>,
}

#[derive(Serialize)]
struct ResponseRow {
    code: String,
    description: String,
    example_html: Option<String>,
}

#[derive(Serialize)]
struct TypeCard {
    anchor: String,
    name: String,
    tag: String,
    tag_display: String,
    description: String,
    interface: String,
    fields: Vec<FieldRow>,
}

#[derive(Serialize)]
struct DocCard {
    anchor: String,
    function_name: String,
    description: String,
    status: String,
    production: bool,
    tag: String,
    tag_display: String,
    version: String,
    args: Vec<FieldRow>,
    returns_html: Option<String>,
    source_html: Option<String>,
}

#[derive(Serialize)]
struct SectionSummary {
    href: &'static str,
    label: String,
    count: usize,
}

impl SiteGenerator {
    pub fn new(dataset: Dataset, config: SiteConfig) -> Result<Self> {
        let catalog = dataset.catalog();
        let primitives = config.primitive_set();
        let mut templates = Handlebars::new();
        if let Some(dir) = SITE_DIR.get_dir("templates") {
            for file in dir.files() {
                let path = file.path();
                if path.extension().and_then(|e| e.to_str()) != Some("hbs") {
                    continue;
                }
                let (Some(name), Some(source)) = (
                    path.file_stem().and_then(|s| s.to_str()),
                    file.contents_utf8(),
                ) else {
                    continue;
                };
                templates.register_template_string(name, source)?;
            }
        }
        Ok(Self {
            dataset,
            config,
            catalog,
            primitives,
            highlighter: Highlighter::new(),
            templates,
        })
    }

    fn builder(&self) -> PreviewBuilder<'_> {
        PreviewBuilder::new(&self.catalog, &self.primitives)
            .with_max_depth(self.config.max_preview_depth)
            .with_max_expansions(self.config.max_preview_expansions)
    }

    /// Writes every page, the normalized dataset and static assets.
    pub fn generate(&self, output: impl AsRef<Path>) -> Result<GenerationReport> {
        let output = output.as_ref();
        fs::create_dir_all(output).map_err(|e| Error::io(output, e))?;

        let mut report = GenerationReport {
            api: self.dataset.api.len(),
            docs: self.dataset.docs.len(),
            types: self.dataset.types.len(),
            ..GenerationReport::default()
        };

        for page in Page::ALL {
            let html = self.render_page(page)?;
            let path = output.join(page.file_name());
            fs::write(&path, html).map_err(|e| Error::io(&path, e))?;
            tracing::debug!(path = %path.display(), "wrote page");
            report.files.push(path);
        }

        let data_path = output.join("data.json");
        let data = serde_json::to_string_pretty(&self.dataset).map_err(|source| Error::Json {
            origin: data_path.display().to_string(),
            source,
        })?;
        fs::write(&data_path, data).map_err(|e| Error::io(&data_path, e))?;
        report.files.push(data_path);

        if let Some(dir) = SITE_DIR.get_dir("static") {
            for file in dir.files() {
                let Some(name) = file.path().file_name() else {
                    continue;
                };
                let path = output.join(name);
                fs::write(&path, file.contents()).map_err(|e| Error::io(&path, e))?;
                report.files.push(path);
            }
        }

        tracing::info!(
            output = %output.display(),
            files = report.files.len(),
            "site generated"
        );
        Ok(report)
    }

    pub fn render_page(&self, page: Page) -> Result<String> {
        let (page_title, body) = match page {
            Page::Home => (self.config.title.clone(), self.render_home()?),
            Page::Api => (self.config.display_name("api"), self.render_api()?),
            Page::Types => (self.config.display_name("types"), self.render_types()?),
            Page::Docs => (self.config.display_name("docs"), self.render_docs()?),
        };
        let nav = self.nav(page);
        let html = self.templates.render(
            "layout",
            &json!({
                "title": self.config.title,
                "page_title": page_title,
                "description": self.config.description,
                "version": self.config.version,
                "theme": self.config.theme,
                "nav": nav,
                "body": body,
            }),
        )?;
        Ok(html)
    }

    fn nav(&self, current: Page) -> Vec<NavLink> {
        let mut links = vec![NavLink {
            href: Page::Home.file_name(),
            label: "Home".to_string(),
            active: current == Page::Home,
        }];
        for page in [Page::Api, Page::Types, Page::Docs] {
            if self.section_len(page) == 0 {
                continue;
            }
            let section = page.section().unwrap_or_default();
            links.push(NavLink {
                href: page.file_name(),
                label: self.config.display_name(section),
                active: current == page,
            });
        }
        links
    }

    fn section_len(&self, page: Page) -> usize {
        match page {
            Page::Home => 0,
            Page::Api => self.dataset.api.len(),
            Page::Types => self.dataset.types.len(),
            Page::Docs => self.dataset.docs.len(),
        }
    }

    fn render_home(&self) -> Result<String> {
        let welcome_html = self.config.welcome.as_deref().and_then(|path| {
            match fs::read_to_string(path) {
                Ok(md) => Some(markdown::to_html(&md)),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "welcome page not readable");
                    None
                }
            }
        });
        let sections: Vec<SectionSummary> = [Page::Api, Page::Types, Page::Docs]
            .into_iter()
            .filter(|page| self.section_len(*page) > 0)
            .map(|page| SectionSummary {
                href: page.file_name(),
                label: self.config.display_name(page.section().unwrap_or_default()),
                count: self.section_len(page),
            })
            .collect();
        Ok(self.templates.render(
            Page::Home.template(),
            &json!({
                "welcome_html": welcome_html,
                "sections": sections,
                "version": self.config.version,
                "description": self.config.description,
                "type_count": self.catalog.len(),
            }),
        )?)
    }

    fn render_api(&self) -> Result<String> {
        let builder = self.builder();
        let cards = self
            .dataset
            .api
            .iter()
            .map(|endpoint| (endpoint.tag.clone(), self.endpoint_card(endpoint, &builder)));
        let groups = self.group_by_tag(cards);
        Ok(self.templates.render(
            Page::Api.template(),
            &json!({
                "groups": groups,
                "statuses": unique(self.dataset.api.iter().map(|e| e.status.as_str())),
                "tags": self.tag_options(self.dataset.api.iter().map(|e| e.tag.as_str())),
                "versions": unique(self.dataset.api.iter().map(|e| e.version.as_str())),
            }),
        )?)
    }

    fn render_types(&self) -> Result<String> {
        let builder = self.builder();
        let cards = self
            .catalog
            .iter()
            .map(|def| self.type_card(def, &builder))
            .collect::<Vec<_>>();
        Ok(self.templates.render(
            Page::Types.template(),
            &json!({
                "cards": cards,
                "tags": self.tag_options(self.catalog.iter().map(|d| d.tag.as_str())),
            }),
        )?)
    }

    fn render_docs(&self) -> Result<String> {
        let builder = self.builder();
        let cards = self
            .dataset
            .docs
            .iter()
            .map(|doc| (doc.tag.clone(), self.doc_card(doc, &builder)));
        let groups = self.group_by_tag(cards);
        Ok(self.templates.render(
            Page::Docs.template(),
            &json!({
                "groups": groups,
                "statuses": unique(self.dataset.docs.iter().map(|d| d.status.as_str())),
                "tags": self.tag_options(self.dataset.docs.iter().map(|d| d.tag.as_str())),
            }),
        )?)
    }

    fn group_by_tag<T>(&self, items: impl Iterator<Item = (String, T)>) -> Vec<TagGroup<T>> {
        let mut grouped: BTreeMap<String, Vec<T>> = BTreeMap::new();
        for (tag, item) in items {
            let tag = if tag.is_empty() { "general".to_string() } else { tag };
            grouped.entry(tag).or_default().push(item);
        }
        grouped
            .into_iter()
            .map(|(tag, items)| TagGroup {
                display: self.config.tag_display(&tag),
                tag,
                items,
            })
            .collect()
    }

    fn tag_options<'a>(&self, tags: impl Iterator<Item = &'a str>) -> Vec<serde_json::Value> {
        unique(tags)
            .into_iter()
            .map(|tag| json!({ "value": tag.to_lowercase(), "label": self.config.tag_display(&tag) }))
            .collect()
    }

    fn field_rows(&self, fields: &BTreeMap<String, FieldSpec>, builder: &PreviewBuilder<'_>) -> Vec<FieldRow> {
        fields
            .iter()
            .map(|(name, spec)| FieldRow {
                name: name.clone(),
                emoji: spec.emoji.clone(),
                label_html: render_label(&builder.label(&spec.declared_type)),
                description: spec.description.clone(),
            })
            .collect()
    }

    fn source_html(&self, source: &str) -> Option<String> {
        (!source.trim().is_empty()).then(|| self.highlighter.highlight(source, SOURCE_LANGUAGE))
    }

    fn endpoint_card(&self, endpoint: &ApiEndpoint, builder: &PreviewBuilder<'_>) -> EndpointCard {
        let json_body_html = endpoint.json_body.as_ref().map(|body| {
            let text = serde_json::to_string_pretty(body).unwrap_or_default();
            self.highlighter.highlight(&text, "json")
        });
        let responses = endpoint
            .responses
            .iter()
            .map(|(code, response)| ResponseRow {
                code: code.clone(),
                description: response.description.clone(),
                example_html: (!response.example.is_null())
                    .then(|| self.example_html(&builder.example(&response.example))),
            })
            .collect();
        EndpointCard {
            anchor: anchor_id("api", &endpoint.function_name),
            function_name: endpoint.function_name.clone(),
            endpoint: endpoint.endpoint.clone(),
            method: endpoint.method.to_uppercase(),
            method_class: endpoint.method.to_lowercase(),
            status: endpoint.status.clone(),
            tag: endpoint.tag.to_lowercase(),
            version: endpoint.version.clone(),
            last_updated: endpoint.last_updated.clone(),
            description: endpoint.description.clone(),
            args: self.field_rows(&endpoint.args, builder),
            json_body_html,
            responses,
            source_html: self.source_html(&endpoint.function_source),
        }
    }

    fn type_card(&self, def: &TypeDefinition, builder: &PreviewBuilder<'_>) -> TypeCard {
        let members: Vec<String> = def
            .fields
            .iter()
            .map(|(name, spec)| format!("    {name}: {};", interface_notation(&spec.declared_type)))
            .collect();
        let interface = format!("interface {} {{\n{}\n}}", def.name, members.join("\n"));
        TypeCard {
            anchor: anchor_id("types", &def.name),
            name: def.name.clone(),
            tag: def.tag.to_lowercase(),
            tag_display: self.config.tag_display(&def.tag),
            description: def.description.clone(),
            interface,
            fields: self.field_rows(&def.fields, builder),
        }
    }

    fn doc_card(&self, doc: &DocItem, builder: &PreviewBuilder<'_>) -> DocCard {
        DocCard {
            anchor: anchor_id("docs", &doc.function_name),
            function_name: doc.function_name.clone(),
            description: doc.description.clone(),
            status: doc.status.clone(),
            production: doc.status == "Production",
            tag: doc.tag.to_lowercase(),
            tag_display: self.config.tag_display(&doc.tag),
            version: doc.version.clone(),
            args: self.field_rows(&doc.args, builder),
            returns_html: doc
                .returns
                .as_ref()
                .and_then(|r| builder.returns(r))
                .map(|view| returns_html(&view)),
            source_html: self.source_html(&doc.function_source),
        }
    }

    fn example_html(&self, view: &ExampleView<'_>) -> String {
        match view {
            ExampleView::Typed {
                type_name,
                body,
                preview,
            } => format!(
                "<div class=\"type-example\"><span class=\"type-detected\">Type: {}</span>{}<div class=\"mini-preview\">{}</div></div>",
                html_escape(type_name),
                self.highlighter.highlight(body, "json"),
                render_preview(preview)
            ),
            ExampleView::Builtin { type_name, body } => format!(
                "<div class=\"type-example\"><span class=\"type-detected\">Type: {}</span>{}</div>",
                html_escape(type_name),
                self.highlighter.highlight(body, "json")
            ),
            ExampleView::UnknownType { type_name, body } => format!(
                "<div class=\"type-example\"><span class=\"type-missing\">Type \"{}\" not found!</span>{}</div>",
                html_escape(type_name),
                self.highlighter.highlight(body, "json")
            ),
            ExampleView::Plain { body } => self.highlighter.highlight(body, "json"),
        }
    }
}

fn returns_html(view: &ReturnsView<'_>) -> String {
    match view {
        ReturnsView::Neutral { text, description } => format!(
            "<span class=\"type-tag type-tag--plain\">{}</span><p class=\"secondary\">{}</p>",
            html_escape(text),
            html_escape(description)
        ),
        ReturnsView::Preview {
            description,
            preview,
        } => format!(
            "<p class=\"secondary\">{}</p><div class=\"mini-preview\">{}</div>",
            html_escape(description),
            render_preview(preview)
        ),
        ReturnsView::Block { label, description } => format!(
            "<div class=\"returns-block\"><h5>Returns</h5>{}<p class=\"secondary\">{}</p></div>",
            render_label(label),
            html_escape(description)
        ),
    }
}

/// Sorted, deduplicated, non-empty values.
fn unique<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
