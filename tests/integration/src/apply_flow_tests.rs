//! End-to-end convergence flow over a realistic fake profile
//!
//! Drives the library crates the same way the CLI does: resolve the
//! profile from profiles.ini, mirror the chrome tree, inject the database,
//! install overrides, render the CSS variables, and verify the whole flow
//! is idempotent.

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use profile_discovery::resolve_in;
use profile_fs::cssvars::{self, CssValue};
use profile_fs::inject::{self, InjectOutcome};
use profile_fs::mirror;
use tempfile::TempDir;

const DB_ASSET: &str = "3870112724rsegmnoittet-es.sqlite";
const DB_SUFFIX: &str = "rsegmnoittet-es.sqlite";

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

struct Fixture {
    _temp: TempDir,
    base: PathBuf,
    assets: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join(".librewolf");
        write(
            &base.join("profiles.ini"),
            "[Install0]\nDefault=abc.default\n\n\
             [Profile0]\nName=default\nPath=abc.default\nDefault=1\n",
        );
        fs::create_dir_all(base.join("abc.default/storage/permanent/chrome/idb")).unwrap();

        let assets = temp.path().join("assets");
        write(&assets.join("chrome/userChrome.css"), "@import url(CSS/osk.css);");
        write(&assets.join("chrome/CSS/osk.css"), "#osk { display: flex; }");
        write(&assets.join("chrome/JS/osk_controller.uc.js"), "// controller");
        write(&assets.join(DB_ASSET), "canonical database");
        write(&assets.join("librewolf.overrides.cfg"), "pref(\"a\", 1);");

        Self {
            _temp: temp,
            base,
            assets,
        }
    }

    /// One full convergence pass; returns the mirror stats.
    fn apply(&self) -> profile_fs::SyncStats {
        let profile = resolve_in(&self.base).unwrap();

        inject::inject_singleton(
            &self.assets.join(DB_ASSET),
            &profile.root_path.join("storage/permanent/chrome/idb"),
            DB_SUFFIX,
        )
        .unwrap();

        let stats = mirror::synchronize(
            &self.assets.join("chrome"),
            &profile.root_path.join("chrome"),
        )
        .unwrap();

        let parent = profile.root_path.parent().unwrap();
        mirror::sync_file(
            &self.assets.join("librewolf.overrides.cfg"),
            &parent.join("librewolf.overrides.cfg"),
        )
        .unwrap();

        stats
    }

    fn profile_root(&self) -> PathBuf {
        self.base.join("abc.default")
    }
}

#[test]
fn first_apply_installs_everything() {
    let fx = Fixture::new();
    let stats = fx.apply();

    assert_eq!(stats.created, 3);
    assert_eq!(stats.failed, 0);

    let profile = fx.profile_root();
    assert_eq!(
        fs::read_to_string(profile.join("chrome/CSS/osk.css")).unwrap(),
        "#osk { display: flex; }"
    );
    assert_eq!(
        fs::read_to_string(profile.join(format!("storage/permanent/chrome/idb/{DB_ASSET}"))).unwrap(),
        "canonical database"
    );
    assert_eq!(
        fs::read_to_string(fx.base.join("librewolf.overrides.cfg")).unwrap(),
        "pref(\"a\", 1);"
    );
}

#[test]
fn second_apply_is_a_complete_noop() {
    let fx = Fixture::new();
    fx.apply();

    let stats = fx.apply();
    assert!(stats.is_noop(), "expected no-op, got {stats:?}");

    let outcome = inject::inject_singleton(
        &fx.assets.join(DB_ASSET),
        &fx.profile_root().join("storage/permanent/chrome/idb"),
        DB_SUFFIX,
    )
    .unwrap();
    assert_eq!(outcome, InjectOutcome::Unchanged);
}

#[test]
fn renamed_database_is_converged_in_place() {
    let fx = Fixture::new();
    fx.apply();

    // Simulate the consumer renaming the database and drifting its content
    let idb = fx.profile_root().join("storage/permanent/chrome/idb");
    fs::rename(idb.join(DB_ASSET), idb.join("9f3arsegmnoittet-es.sqlite")).unwrap();
    fs::write(idb.join("9f3arsegmnoittet-es.sqlite"), "consumer drift").unwrap();

    let outcome = inject::inject_singleton(&fx.assets.join(DB_ASSET), &idb, DB_SUFFIX).unwrap();

    assert_eq!(outcome, InjectOutcome::Updated);
    assert_eq!(
        fs::read_to_string(idb.join("9f3arsegmnoittet-es.sqlite")).unwrap(),
        "canonical database"
    );
    assert!(!idb.join(DB_ASSET).exists());
}

#[test]
fn template_changes_propagate_and_stale_files_disappear() {
    let fx = Fixture::new();
    fx.apply();

    write(&fx.assets.join("chrome/CSS/osk.css"), "#osk { display: grid; }");
    fs::remove_file(fx.assets.join("chrome/JS/osk_controller.uc.js")).unwrap();

    let stats = fx.apply();

    assert_eq!(stats.updated, 1);
    assert_eq!(stats.removed_files, 1);
    let profile = fx.profile_root();
    assert_eq!(
        fs::read_to_string(profile.join("chrome/CSS/osk.css")).unwrap(),
        "#osk { display: grid; }"
    );
    assert!(!profile.join("chrome/JS/osk_controller.uc.js").exists());
}

#[test]
fn generated_css_lands_in_the_managed_tree() {
    let fx = Fixture::new();
    fx.apply();

    let chrome = fx.profile_root().join("chrome");
    let vars = vec![
        (
            "calculatedPortraitOSKHeight".to_string(),
            CssValue::Px(640.0),
        ),
        ("screenMode".to_string(), CssValue::Raw("staged".into())),
    ];
    let css_path = cssvars::write_css_variables(&chrome, "system-parameters", &vars).unwrap();

    let content = fs::read_to_string(&css_path).unwrap();
    assert!(content.contains("--calculated-portrait-o-s-k-height: 640px;"));
    assert!(content.contains("--screen-mode: staged;"));

    // The generated file has no template counterpart: the next mirror pass
    // deletes it, and the startup order sync-then-generate brings it back.
    fx.apply();
    assert!(!css_path.exists());
    cssvars::write_css_variables(&chrome, "system-parameters", &vars).unwrap();
    assert!(css_path.exists());
}

#[test]
fn teardown_only_removes_an_emptied_tree() {
    let fx = Fixture::new();
    fx.apply();

    let chrome = fx.profile_root().join("chrome");
    assert!(mirror::remove_dest_root(&chrome).is_err());

    for entry in [
        "chrome/userChrome.css",
        "chrome/CSS/osk.css",
        "chrome/JS/osk_controller.uc.js",
    ] {
        fs::remove_file(fx.profile_root().join(entry)).unwrap();
    }
    fs::remove_dir(chrome.join("CSS")).unwrap();
    fs::remove_dir(chrome.join("JS")).unwrap();

    mirror::remove_dest_root(&chrome).unwrap();
    assert!(!chrome.exists());
}
