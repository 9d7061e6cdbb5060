use std::fs;
use std::io::Cursor;

use git2::Repository;
use tempfile::TempDir;

use dotman::core::{hash_file, Classification};
use dotman::reconcile::{CopyOutcome, Direction, Reconciler};
use dotman::render::{DiffRenderer, Theme};
use dotman::review::{Reviewer, SequentialReviewer};
use dotman::services::{GitService, VersionControl, Workspace};
use dotman::utils::MIN_PREFIX_LEN;

/// A dotfile repository with a `home/` mirror and a separate fake `$HOME`
struct Fixture {
    _dir: TempDir,
    ws: Workspace,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let ws = Workspace::new(dir.path().join("dotfiles"), dir.path().join("home-user"));
        fs::create_dir_all(ws.mirror()).unwrap();
        fs::create_dir_all(ws.home()).unwrap();
        Self { _dir: dir, ws }
    }

    fn repo_file(&self, rel: &str, content: &str) {
        let path = self.ws.mirror_path(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn home_file(&self, rel: &str, content: &str) {
        let path = self.ws.home_path(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

/// Review with scripted answers, diffs rendered without color
fn review_with(script: &str, items: &[dotman::review::ReviewItem]) -> (dotman::ReviewOutcome, String) {
    let renderer = DiffRenderer::with_theme(Theme::plain());
    let mut reviewer = SequentialReviewer::new(Cursor::new(script.to_string()), Vec::new(), renderer);
    let outcome = reviewer.review(items).unwrap();
    (outcome, String::from_utf8(reviewer.into_output()).unwrap())
}

/// Missing file in home is created byte-for-byte
#[test]
fn test_missing_file_is_applied() {
    let fx = Fixture::new();
    fx.repo_file("bashrc", "export PATH=$HOME/bin:$PATH\n");

    let reconciler = Reconciler::new(&fx.ws, Direction::ToHome);
    let candidates = reconciler.candidates(&[]).unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].classification(), Classification::Missing);

    let items = reconciler.review_items(&candidates);
    let (outcome, _) = review_with("y\n", &items);
    assert!(outcome.proceed);

    let reports = reconciler.apply(&outcome.selected, |_| {});
    assert_eq!(reports[0].outcome, CopyOutcome::Created);
    assert_eq!(
        fs::read(fx.ws.home_path("bashrc")).unwrap(),
        fs::read(fx.ws.mirror_path("bashrc")).unwrap()
    );
}

/// Differing file shows unique prefixes; declining leaves both sides alone
#[test]
fn test_declined_difference_is_untouched() {
    let fx = Fixture::new();
    fx.repo_file("vimrc", "set number\n");
    fx.home_file("vimrc", "set relativenumber\n");

    let reconciler = Reconciler::new(&fx.ws, Direction::ToHome);
    let candidates = reconciler.candidates(&[]).unwrap();
    assert_eq!(candidates[0].classification(), Classification::Differing);

    let hashes = candidates[0].entry.display_hashes().unwrap();
    assert!(hashes.repo.len() >= MIN_PREFIX_LEN);
    assert_eq!(hashes.repo.len(), hashes.target.len());
    assert_ne!(hashes.repo, hashes.target);

    let items = reconciler.review_items(&candidates);
    let (outcome, output) = review_with("n\n", &items);
    assert!(outcome.proceed);
    assert!(outcome.selected.is_empty());
    assert!(output.contains("set relativenumber"));

    let reports = reconciler.apply(&outcome.selected, |_| {});
    assert!(reports.is_empty());
    assert_eq!(fs::read_to_string(fx.ws.mirror_path("vimrc")).unwrap(), "set number\n");
    assert_eq!(
        fs::read_to_string(fx.ws.home_path("vimrc")).unwrap(),
        "set relativenumber\n"
    );
}

/// Identical files are never surfaced, rendered or prompted for
#[test]
fn test_identical_files_are_never_prompted() {
    let fx = Fixture::new();
    fx.repo_file("gitconfig", "[user]\n\tname = me\n");
    fx.home_file("gitconfig", "[user]\n\tname = me\n");
    fx.repo_file("tmux.conf", "set -g mouse on\n");

    let reconciler = Reconciler::new(&fx.ws, Direction::ToHome);
    let candidates = reconciler.candidates(&[]).unwrap();
    let paths: Vec<&str> = candidates.iter().map(|c| c.rel_path()).collect();
    assert_eq!(paths, vec!["tmux.conf"]);

    let (_, output) = review_with("\n", &reconciler.review_items(&candidates));
    assert!(!output.contains("gitconfig"));
}

/// An empty file against a non-empty one still renders at the height floor
#[test]
fn test_empty_versus_nonempty_renders() {
    let fx = Fixture::new();
    fx.repo_file("empty", "");
    fx.home_file("empty", "something\n");

    let reconciler = Reconciler::new(&fx.ws, Direction::ToHome);
    let items = reconciler.review_items(&reconciler.candidates(&[]).unwrap());
    let block = DiffRenderer::with_theme(Theme::plain())
        .render(&items[0].pair, true, 1, 1)
        .unwrap();

    let theme = Theme::plain();
    assert!(block.lines().count() >= theme.min_panel_height);
    assert!(block.contains("something"));
}

#[test]
fn test_comparison_is_idempotent() {
    let fx = Fixture::new();
    fx.repo_file(".config/nvim/init.lua", "vim.o.number = true\n");
    fx.home_file(".config/nvim/init.lua", "vim.o.number = false\n");
    fx.repo_file(".zshrc", "bindkey -e\n");

    let reconciler = Reconciler::new(&fx.ws, Direction::ToHome);
    let first = reconciler.candidates(&[]).unwrap();
    let second = reconciler.candidates(&[]).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_hash_matches_for_same_bytes() {
    let fx = Fixture::new();
    fx.repo_file("a", "same bytes");
    fx.home_file("a", "same bytes");
    assert_eq!(
        hash_file(&fx.ws.mirror_path("a")).unwrap(),
        hash_file(&fx.ws.home_path("a")).unwrap()
    );
}

/// Submitting from home: git-flagged new files join content changes, get
/// copied, staged under `home/` and committed
#[test]
fn test_submit_round_trip_with_git() {
    let fx = Fixture::new();
    let repo = Repository::init(fx.ws.root()).unwrap();
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test User").unwrap();
    config.set_str("user.email", "test@example.com").unwrap();

    let git = GitService::new(fx.ws.root(), false);

    fx.repo_file(".bashrc", "alias g=git\n");
    git.stage(&git.status().unwrap()).unwrap();
    git.commit("initial").unwrap();

    fx.home_file(".bashrc", "alias g=git\nalias k=kubectl\n");
    fx.repo_file(".inputrc", "set editing-mode vi\n");
    fx.home_file(".inputrc", "set editing-mode vi\n");

    let flagged = git.status().unwrap();
    assert_eq!(flagged, vec!["home/.inputrc"]);

    let reconciler = Reconciler::new(&fx.ws, Direction::ToRepo);
    let candidates = reconciler.candidates(&flagged).unwrap();
    let paths: Vec<&str> = candidates.iter().map(|c| c.rel_path()).collect();
    assert_eq!(paths, vec![".bashrc", ".inputrc"]);
    assert!(candidates[1].flagged);

    let selected: Vec<String> = paths.iter().map(|p| p.to_string()).collect();
    let reports = reconciler.apply(&selected, |_| {});
    assert_eq!(reports[0].outcome, CopyOutcome::Updated);

    let oid = reconciler.commit(&git, &selected, "").unwrap();
    assert!(oid.is_some());
    assert!(git.status().unwrap().is_empty());

    let head = repo.head().unwrap().peel_to_commit().unwrap();
    assert_eq!(head.message(), Some("Update dotfiles"));
    assert_eq!(
        fs::read_to_string(fx.ws.mirror_path(".bashrc")).unwrap(),
        "alias g=git\nalias k=kubectl\n"
    );
}

/// Cancelling part way through the review copies nothing
#[test]
fn test_cancel_copies_nothing() {
    let fx = Fixture::new();
    fx.repo_file("a", "1");
    fx.repo_file("b", "2");

    let reconciler = Reconciler::new(&fx.ws, Direction::ToHome);
    let items = reconciler.review_items(&reconciler.candidates(&[]).unwrap());
    let (outcome, _) = review_with("y\nq\n", &items);

    assert!(!outcome.proceed);
    assert!(outcome.selected.is_empty());
    assert!(!fx.ws.home_path("a").exists());
}
