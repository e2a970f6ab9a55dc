//! Start-up, stylesheet loading and shutdown of the application context.

use std::fs;
use std::path::Path;

use trailmark::{AppContext, OsType, ResourcePaths, UserPaths};

const MAIN_CSS: &str = "\
QWidget { font: <setting:font_size>pt \"<setting:font_name>\"; color: <color:text/primary>; }
QPushButton { padding: <platform_wml:4px|2px|3px>; image: url(<setting:gui_path>images/x.png); }
";

fn install(root: &Path) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    fs::create_dir_all(root.join("data/gui/main")).unwrap();
    fs::create_dir_all(root.join("data/color_schemes")).unwrap();
    fs::create_dir_all(root.join("data/user/projects")).unwrap();

    fs::write(root.join("data/gui/main/main.css"), MAIN_CSS).unwrap();
    fs::write(root.join("data/gui/main/broken.css"), "QWidget { color: <colour:text>; }").unwrap();
    fs::write(
        root.join("data/color_schemes/bright.toml"),
        "[text]\nprimary = \"#202020\"\n",
    )
    .unwrap();
    fs::write(root.join("data/user/projects/tutorial.srctrlprj"), "tutorial").unwrap();
}

#[test]
fn init_copies_user_data_and_resolves_stylesheets() {
    let install_dir = tempfile::tempdir().unwrap();
    let user_dir = tempfile::tempdir().unwrap();
    install(install_dir.path());

    let context = AppContext::init(
        ResourcePaths::new(install_dir.path()),
        UserPaths::in_directory(user_dir.path()),
    )
    .unwrap()
    .with_platform(OsType::Linux);

    assert!(user_dir.path().join("projects/tutorial.srctrlprj").exists());
    assert_eq!(context.color_scheme().color("text/primary"), "#202020");

    let gui = context.resources().gui_path().to_string_lossy().replace('\\', "/");
    let css = context.load_style_sheet("main/main.css");
    assert_eq!(
        css,
        format!(
            "QWidget {{ font: 14pt \"Source Code Pro\"; color: #202020; }}\n\
             QPushButton {{ padding: 3px; image: url({gui}images/x.png); }}\n"
        )
    );
}

#[test]
fn broken_stylesheet_yields_empty_text() {
    let install_dir = tempfile::tempdir().unwrap();
    let user_dir = tempfile::tempdir().unwrap();
    install(install_dir.path());

    let context = AppContext::init(
        ResourcePaths::new(install_dir.path()),
        UserPaths::in_directory(user_dir.path()),
    )
    .unwrap();

    assert_eq!(context.load_style_sheet("main/broken.css"), "");
    assert_eq!(context.load_style_sheet("main/missing.css"), "");
    assert!(context.try_load_style_sheet("main/broken.css").is_err());
}

#[test]
fn missing_color_scheme_falls_back_to_defaults() {
    let install_dir = tempfile::tempdir().unwrap();
    let user_dir = tempfile::tempdir().unwrap();
    install(install_dir.path());
    fs::remove_file(install_dir.path().join("data/color_schemes/bright.toml")).unwrap();

    let context = AppContext::init(
        ResourcePaths::new(install_dir.path()),
        UserPaths::in_directory(user_dir.path()),
    )
    .unwrap();

    assert!(context.color_scheme().is_empty());
    assert_eq!(context.color_scheme().color("text/primary"), "#FFFFFF");
}

#[test]
fn settings_survive_teardown() {
    let install_dir = tempfile::tempdir().unwrap();
    let user_dir = tempfile::tempdir().unwrap();
    install(install_dir.path());
    let resources = ResourcePaths::new(install_dir.path());
    let user = UserPaths::in_directory(user_dir.path());

    let context = AppContext::init(resources.clone(), user.clone()).unwrap();
    context.settings().set_font_size(18);
    context.teardown().unwrap();
    assert!(user.settings_file().exists());

    let context = AppContext::init(resources, user).unwrap().with_platform(OsType::Linux);
    assert_eq!(context.settings().font_size(), 18);
    assert!(context.load_style_sheet("main/main.css").contains("font: 18pt"));
}

#[test]
fn enabling_logging_starts_a_log_file() {
    let install_dir = tempfile::tempdir().unwrap();
    let user_dir = tempfile::tempdir().unwrap();
    install(install_dir.path());
    let user = UserPaths::in_directory(user_dir.path());

    let context = AppContext::init(ResourcePaths::new(install_dir.path()), user.clone()).unwrap();
    assert!(!context.log_manager().is_logging_enabled());

    context.settings().set_logging_enabled(true);
    context.apply_logging_settings().unwrap();
    assert!(context.log_manager().is_logging_enabled());
    assert_eq!(context.log_manager().logger_count(), 2);
    assert_eq!(fs::read_dir(user.log_path()).unwrap().count(), 1);

    context.teardown().unwrap();
}
