//! Integration tests for entity generation against a project directory

use std::fs;
use std::path::Path;

use entigen::provider::{template_path, DOCS_CATEGORY, ENTITY_CATEGORY};
use entigen_cli::{EntityCommand, EntityOutcome, StyleArg, TemplatesCommand, Workspace};
use figment::Jail;
use tempfile::TempDir;

fn write(root: &Path, relative: impl AsRef<Path>, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn entity(model: &str, fields: &[&str]) -> EntityCommand {
    EntityCommand {
        model: model.to_string(),
        fields: fields.iter().map(ToString::to_string).collect(),
        force: true,
        ..EntityCommand::default()
    }
}

/// A complete entity with the default configuration
#[test]
fn test_generate_default_entity() {
    let project = TempDir::new().unwrap();

    let outcome = entity("Post", &["title:string", "views:integer:int32"])
        .execute(&Workspace::isolated(project.path()))
        .unwrap();

    let path = project.path().join("app/Domains/Post/PostEntity.php");
    assert_eq!(outcome, EntityOutcome::Written(path.clone()));

    let content = fs::read_to_string(path).unwrap();
    assert!(content.starts_with("<?php\n\nnamespace App\\Domains\\Post;\n"));
    assert!(content.contains("use App\\Domains\\Post\\PostFactory;\nuse App\\Domains\\Post\\PostCollection;\n"));
    assert!(content.contains("definition=\"Post\""));
    assert!(content.contains("required={\"\"}"));
    assert!(content.contains("class PostEntity\n{"));
    assert!(content.contains("private $title;"));
    assert!(content.contains("private $views;"));
    assert!(content.contains("format=\"int32\""));
    assert!(content.contains("public function setTitle($title): PostEntity"));
    assert!(content.contains("public function getViews()"));
    assert!(content.contains("'title' => $this->getTitle(),\n            'views' => $this->getViews(),"));
    assert!(!content.contains("$PROPERTIES$"));
    assert!(!content.contains("$SETTERS$"));
    assert!(!content.contains("$GETTERS$"));
    assert!(!content.contains("$PROPERTY_CASTS$"));
}

/// Project configuration changes paths, namespaces and style
#[test]
fn test_generate_with_project_config() {
    let project = TempDir::new().unwrap();
    write(
        project.path(),
        "entigen.toml",
        r#"
domains_path = "src/Domains"
domains_namespace = "Acme\\Domains"
style = "bare"
"#,
    );

    entity("Invoice", &["total:number:float"])
        .execute(&Workspace::isolated(project.path()))
        .unwrap();

    let content =
        fs::read_to_string(project.path().join("src/Domains/Invoice/InvoiceEntity.php")).unwrap();
    assert!(content.contains("namespace Acme\\Domains\\Invoice;"));
    assert!(content.contains("use Acme\\Domains\\Invoice\\InvoiceFactory\n"));
}

/// The command-line style flag beats the configured preset
#[test]
fn test_style_flag_overrides_config() {
    let project = TempDir::new().unwrap();
    write(project.path(), "entigen.toml", "style = \"bare\"\n");

    let mut cmd = entity("Post", &["title:string"]);
    cmd.style = Some(StyleArg::Semicolon);
    let file = cmd.render(&Workspace::isolated(project.path())).unwrap();

    assert!(file.content.contains("use App\\Domains\\Post\\PostFactory;"));
}

/// Project templates replace the built-in ones
#[test]
fn test_project_template_override() {
    let project = TempDir::new().unwrap();
    let templates = project.path().join(".entigen/templates");
    write(
        &templates,
        template_path(ENTITY_CATEGORY, "domains.entity_getter"),
        "    public function $PROPERTY$() { return $this->$PROPERTY$; }\n",
    );
    write(
        &templates,
        template_path(DOCS_CATEGORY, "model_docs.property"),
        "    /** @var $FIELD_TYPE$ */\n",
    );

    let file = entity("Post", &["title:string", "body:text"])
        .render(&Workspace::isolated(project.path()))
        .unwrap();

    assert!(file.content.contains("public function title() { return $this->title; }"));
    assert!(file.content.contains("/** @var text */\n    private $body;"));
    assert!(!file.content.contains("@SWG\\Property"));
}

/// Exported templates are picked up unchanged by the next generation
#[test]
fn test_init_then_generate_matches_builtin() {
    let project = TempDir::new().unwrap();
    let workspace = Workspace::isolated(project.path());
    let before = entity("Post", &["title:string"]).render(&workspace).unwrap();

    TemplatesCommand::Init { dir: None, force: false }
        .execute(&workspace)
        .unwrap();
    let after = entity("Post", &["title:string"]).render(&workspace).unwrap();

    assert_eq!(before.content, after.content);
}

/// Fields can come from a JSON file
#[test]
fn test_fields_file() {
    let project = TempDir::new().unwrap();
    write(
        project.path(),
        "fields.json",
        r#"[
            {"name": "published_at", "type": "string", "format": "date-time"},
            {"name": "author_id", "type": "integer"}
        ]"#,
    );

    let mut cmd = entity("Article", &[]);
    cmd.fields_file = Some(project.path().join("fields.json"));
    let file = cmd.render(&Workspace::isolated(project.path())).unwrap();

    assert!(file.content.contains("private $publishedAt;"));
    assert!(file.content.contains("public function getAuthorId()"));
    assert!(file.content.contains("'publishedAt' => $this->getPublishedAt(),"));
    assert!(file.content.contains("format=\"date-time\""));
}

/// Invalid input is reported without writing anything
#[test]
fn test_invalid_input_writes_nothing() {
    let project = TempDir::new().unwrap();
    let workspace = Workspace::isolated(project.path());

    assert!(entity("post", &["title:string"]).execute(&workspace).is_err());
    assert!(entity("Post", &["title"]).execute(&workspace).is_err());
    assert!(entity("Post", &["title:string", "title:text"]).execute(&workspace).is_err());
    assert!(entity("Post", &["title:$GETTERS$"]).execute(&workspace).is_err());

    assert!(!project.path().join("app").exists());
}

/// Only a workspace built from the environment sees `ENTIGEN_*` and the
/// user template directory
#[test]
fn test_environment_reaches_only_env_workspace() {
    Jail::expect_with(|jail| {
        let getter = Path::new("xdg/entigen/templates")
            .join(template_path(ENTITY_CATEGORY, "domains.entity_getter"));
        fs::create_dir_all(jail.directory().join(getter.parent().unwrap()))
            .map_err(|e| e.to_string())?;
        jail.create_file(&getter, "    // custom getter for $PROPERTY$\n")?;
        jail.set_env("XDG_CONFIG_HOME", jail.directory().join("xdg").display());
        jail.set_env("ENTIGEN_STYLE", "bare");

        let cmd = entity("Post", &["title:string"]);

        let isolated = cmd
            .render(&Workspace::isolated(jail.directory()))
            .map_err(|e| e.to_string())?;
        assert!(isolated.content.contains("use App\\Domains\\Post\\PostFactory;"));
        assert!(isolated.content.contains("public function getTitle()"));

        let from_env = cmd
            .render(&Workspace::from_env(jail.directory()))
            .map_err(|e| e.to_string())?;
        assert!(from_env.content.contains("use App\\Domains\\Post\\PostFactory\n"));
        assert!(from_env.content.contains("// custom getter for title"));
        assert!(!from_env.content.contains("public function getTitle()"));
        Ok(())
    });
}
