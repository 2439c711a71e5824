#[allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

// ─── helpers ───────────────────────────────────────────────────────

struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        let dir = TempDir::new().expect("create tempdir");
        Self { dir }
    }

    /// Initialized home with a signed-in user.
    fn signed_in() -> Self {
        let env = Self::new();
        env.run_ok(&["init"]);
        env.signup("Ada Lovelace", "ada@example.com", "secret1");
        env
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("kanban").expect("binary");
        cmd.current_dir(self.dir.path());
        cmd.env_remove("KANBAN_HOME");
        cmd.env_remove("KANBAN_LOG");
        cmd
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let mut a: Vec<&str> = args.to_vec();
        a.push("--json");
        let output = self.cmd().args(&a).output().expect("run");
        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("parse JSON failed: {e}\nstdout: {stdout}"))
    }

    fn run_ok(&self, args: &[&str]) -> Value {
        let v = self.run_json(args);
        assert_eq!(v["success"], true, "expected success=true: {v}");
        v
    }

    fn run_err(&self, args: &[&str]) -> Value {
        let v = self.run_json(args);
        assert_eq!(v["success"], false, "expected success=false: {v}");
        v
    }

    fn signup(&self, name: &str, email: &str, password: &str) -> Value {
        self.run_ok(&[
            "signup",
            "--name",
            name,
            "--email",
            email,
            "--password",
            password,
            "--confirm-password",
            password,
        ])
    }

    fn add_task(&self, content: &str, status: &str) -> String {
        let v = self.run_ok(&["task", "add", content, "--status", status]);
        v["data"]["task"]["id"].as_str().unwrap().to_string()
    }

    fn tasks_in(&self, status: &str) -> Vec<Value> {
        let v = self.run_ok(&["task", "list", "--status", status]);
        v["data"]["tasks"].as_array().unwrap().clone()
    }

    fn column_names(&self) -> Vec<String> {
        let v = self.run_ok(&["column", "list"]);
        v["data"]["columns"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap().to_string())
            .collect()
    }
}

fn ids(tasks: &[Value]) -> Vec<&str> {
    tasks.iter().map(|t| t["id"].as_str().unwrap()).collect()
}

// ─── 1. init ───────────────────────────────────────────────────────

#[test]
fn test_init() {
    let env = TestEnv::new();
    let v = env.run_ok(&["init"]);
    let path = v["data"]["path"].as_str().unwrap();
    assert!(path.ends_with(".kanban/kanban.db"));
    assert!(PathBuf::from(path).exists());
}

#[test]
fn test_init_idempotent() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let v = env.run_ok(&["init"]);
    assert!(v["data"]["path"].as_str().unwrap().contains("kanban.db"));
}

#[test]
fn test_init_required_before_commands() {
    let env = TestEnv::new();
    let v = env.run_err(&["board"]);
    assert_eq!(v["error"]["code"], "NOT_INITIALIZED");
}

#[test]
fn test_home_found_from_subdirectory() {
    let env = TestEnv::signed_in();
    let sub = env.dir.path().join("nested/deeper");
    std::fs::create_dir_all(&sub).unwrap();
    let output = env
        .cmd()
        .current_dir(&sub)
        .args(["whoami", "--json"])
        .output()
        .expect("run");
    let v: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["data"]["user"]["email"], "ada@example.com");
}

// ─── 2. identity ───────────────────────────────────────────────────

#[test]
fn test_signup_signs_in() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let v = env.signup("Ada Lovelace", "Ada@Example.com", "secret1");
    assert_eq!(v["data"]["user"]["email"], "ada@example.com");
    assert_eq!(v["data"]["user"]["initials"], "AL");

    let who = env.run_ok(&["whoami"]);
    assert_eq!(who["data"]["user"]["display_name"], "Ada Lovelace");
}

#[test]
fn test_signup_seeds_default_columns() {
    let env = TestEnv::signed_in();
    assert_eq!(env.column_names(), vec!["to-do", "doing", "done"]);
}

#[test]
fn test_signup_validation_errors() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let v = env.run_err(&[
        "signup",
        "--name",
        "A",
        "--email",
        "not-an-email",
        "--password",
        "123",
        "--confirm-password",
        "456",
    ]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = v["error"]["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password"));
    assert!(fields.contains(&"confirm_password"));
}

#[test]
fn test_signup_duplicate_email() {
    let env = TestEnv::signed_in();
    let v = env.run_err(&[
        "signup",
        "--name",
        "Someone",
        "--email",
        "ada@example.com",
        "--password",
        "secret1",
        "--confirm-password",
        "secret1",
    ]);
    assert_eq!(v["error"]["code"], "EMAIL_TAKEN");
}

#[test]
fn test_logout_then_login() {
    let env = TestEnv::signed_in();
    let v = env.run_ok(&["logout"]);
    assert_eq!(v["data"]["signed_out"], true);

    let v = env.run_err(&["board"]);
    assert_eq!(v["error"]["code"], "NOT_AUTHENTICATED");

    let v = env.run_err(&["login", "--email", "ada@example.com", "--password", "wrong12"]);
    assert_eq!(v["error"]["code"], "INVALID_CREDENTIALS");

    env.run_ok(&["login", "--email", "ada@example.com", "--password", "secret1"]);
    env.run_ok(&["board"]);
}

#[test]
fn test_boards_are_per_user() {
    let env = TestEnv::signed_in();
    env.add_task("Ada's task", "to-do");
    env.run_ok(&["logout"]);
    env.signup("Grace Hopper", "grace@example.com", "secret2");
    assert!(env.tasks_in("to-do").is_empty());
}

#[test]
fn test_whoami_text_when_signed_out() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    env.cmd()
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not signed in"));
}

// ─── 3. tasks ──────────────────────────────────────────────────────

#[test]
fn test_task_add_appends_to_column() {
    let env = TestEnv::signed_in();
    let a = env.add_task("first", "to-do");
    let b = env.add_task("second", "to-do");
    let tasks = env.tasks_in("to-do");
    assert_eq!(ids(&tasks), vec![a.as_str(), b.as_str()]);
    assert_eq!(tasks[0]["order_index"], 0);
    assert_eq!(tasks[1]["order_index"], 1);
}

#[test]
fn test_task_add_unknown_column() {
    let env = TestEnv::signed_in();
    let v = env.run_err(&["task", "add", "x", "--status", "review"]);
    assert_eq!(v["error"]["code"], "STATUS_NOT_FOUND");
}

#[test]
fn test_task_add_empty_content() {
    let env = TestEnv::signed_in();
    let v = env.run_err(&["task", "add", "   "]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

#[test]
fn test_task_edit_describe_comment() {
    let env = TestEnv::signed_in();
    let id = env.add_task("draft", "to-do");

    let v = env.run_ok(&["task", "edit", &id, "final"]);
    assert_eq!(v["data"]["task"]["content"], "final");
    assert_eq!(v["notices"][0]["message"], "Task updated successfully");

    env.run_ok(&["task", "describe", &id, "longer text"]);
    env.run_ok(&["task", "comment", &id, "looks good"]);

    let v = env.run_ok(&["task", "show", &id[..10]]);
    let task = &v["data"]["task"];
    assert_eq!(task["description"], "longer text");
    assert_eq!(task["activities"][0], "looks good");
    assert!(task["updated_at"].is_string());
}

#[test]
fn test_task_delete() {
    let env = TestEnv::signed_in();
    let id = env.add_task("gone", "to-do");
    let v = env.run_ok(&["task", "delete", &id]);
    assert_eq!(v["notices"][0]["message"], "Task deleted successfully");
    let v = env.run_err(&["task", "show", &id]);
    assert_eq!(v["error"]["code"], "TASK_NOT_FOUND");
}

// ─── 4. drag and drop ──────────────────────────────────────────────

#[test]
fn test_drag_reorder_within_column() {
    let env = TestEnv::signed_in();
    let t1 = env.add_task("t1", "to-do");
    let t2 = env.add_task("t2", "to-do");

    let v = env.run_ok(&["drag", &t2, &t1]);
    assert_eq!(v["data"]["outcome"]["kind"], "reordered");
    assert_eq!(v["data"]["persisted"], true);

    let tasks = env.tasks_in("to-do");
    assert_eq!(ids(&tasks), vec![t2.as_str(), t1.as_str()]);
    assert_eq!(tasks[0]["order_index"], 0);
    assert_eq!(tasks[1]["order_index"], 1);
}

#[test]
fn test_drag_onto_empty_column() {
    let env = TestEnv::signed_in();
    let t1 = env.add_task("t1", "to-do");
    let t2 = env.add_task("t2", "to-do");

    let v = env.run_ok(&["drag", &t1, "doing"]);
    assert_eq!(v["data"]["outcome"]["kind"], "moved_across");
    assert_eq!(v["data"]["outcome"]["to"], "doing");

    let doing = env.tasks_in("doing");
    assert_eq!(ids(&doing), vec![t1.as_str()]);
    assert_eq!(doing[0]["order_index"], 0);

    // Source column keeps its gap.
    let todo = env.tasks_in("to-do");
    assert_eq!(ids(&todo), vec![t2.as_str()]);
    assert_eq!(todo[0]["order_index"], 1);
}

#[test]
fn test_drag_onto_task_in_other_column_appends() {
    let env = TestEnv::signed_in();
    let a = env.add_task("a", "to-do");
    let b = env.add_task("b", "doing");
    let c = env.add_task("c", "doing");

    env.run_ok(&["drag", &a, &b]);
    let doing = env.tasks_in("doing");
    assert_eq!(ids(&doing), vec![b.as_str(), c.as_str(), a.as_str()]);
    assert_eq!(doing[2]["order_index"], 2);
}

#[test]
fn test_drag_with_compaction_enabled() {
    let env = TestEnv::signed_in();
    env.run_ok(&["config", "set", "compact-source-on-move", "true"]);
    let t1 = env.add_task("t1", "to-do");
    let t2 = env.add_task("t2", "to-do");

    env.run_ok(&["drag", &t1, "done"]);
    let todo = env.tasks_in("to-do");
    assert_eq!(ids(&todo), vec![t2.as_str()]);
    assert_eq!(todo[0]["order_index"], 0);
}

#[test]
fn test_drag_without_target_is_noop() {
    let env = TestEnv::signed_in();
    let t1 = env.add_task("t1", "to-do");
    let v = env.run_ok(&["drag", &t1]);
    assert_eq!(v["data"]["outcome"]["kind"], "no_op");
    assert_eq!(v["data"]["outcome"]["reason"], "no_target");
}

#[test]
fn test_drag_unknown_item_is_noop() {
    let env = TestEnv::signed_in();
    let v = env.run_ok(&["drag", "nope", "doing"]);
    assert_eq!(v["data"]["outcome"]["reason"], "unknown_item");
}

#[test]
fn test_drag_column_reorder() {
    let env = TestEnv::signed_in();
    env.run_ok(&["column", "add", "review"]);

    let v = env.run_ok(&["drag", "review", "to-do"]);
    assert_eq!(v["data"]["outcome"]["kind"], "columns_reordered");
    assert_eq!(env.column_names(), vec!["review", "to-do", "doing", "done"]);

    let v = env.run_ok(&["column", "list"]);
    let indices: Vec<i64> = v["data"]["columns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["order_index"].as_i64().unwrap())
        .collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);
}

// ─── 5. columns ────────────────────────────────────────────────────

#[test]
fn test_column_add_duplicate() {
    let env = TestEnv::signed_in();
    env.run_ok(&["column", "add", "review"]);
    let v = env.run_err(&["column", "add", "review"]);
    assert_eq!(v["error"]["code"], "STATUS_NAME_CONFLICT");
    assert_eq!(v["error"]["message"], "This status already exists!");
}

#[test]
fn test_column_add_empty_name() {
    let env = TestEnv::signed_in();
    let v = env.run_err(&["column", "add", "  "]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

#[test]
fn test_default_column_protected() {
    let env = TestEnv::signed_in();
    let v = env.run_err(&["column", "delete", "doing"]);
    assert_eq!(v["error"]["code"], "DEFAULT_STATUS_PROTECTED");
    assert_eq!(v["error"]["message"], "Cannot delete default statuses!");

    let v = env.run_err(&["column", "rename", "done", "finished"]);
    assert_eq!(v["error"]["code"], "DEFAULT_STATUS_PROTECTED");
}

#[test]
fn test_column_delete_cascades_tasks() {
    let env = TestEnv::signed_in();
    env.run_ok(&["column", "add", "review"]);
    let r1 = env.add_task("r1", "review");
    env.add_task("r2", "review");
    let keep = env.add_task("keep", "to-do");

    let v = env.run_ok(&["column", "delete", "review"]);
    assert_eq!(v["data"]["tasks_removed"], 2);
    assert_eq!(v["notices"][0]["message"], "Status deleted successfully!");

    assert_eq!(env.column_names(), vec!["to-do", "doing", "done"]);
    env.run_err(&["task", "show", &r1]);
    env.run_ok(&["task", "show", &keep]);
}

#[test]
fn test_column_rename_moves_tasks() {
    let env = TestEnv::signed_in();
    env.run_ok(&["column", "add", "review"]);
    let id = env.add_task("r1", "review");

    let v = env.run_ok(&["column", "rename", "review", "qa"]);
    assert_eq!(v["notices"][0]["message"], "Status renamed successfully!");
    assert_eq!(ids(&env.tasks_in("qa")), vec![id.as_str()]);

    let v = env.run_err(&["task", "list", "--status", "review"]);
    assert_eq!(v["error"]["code"], "STATUS_NOT_FOUND");
}

// ─── 6. board / config / text output ───────────────────────────────

#[test]
fn test_board_json_lists_columns_with_tasks() {
    let env = TestEnv::signed_in();
    env.add_task("a", "doing");
    let v = env.run_ok(&["board"]);
    let columns = v["data"]["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 3);
    assert_eq!(columns[1]["name"], "doing");
    assert_eq!(columns[1]["task_count"], 1);
    assert_eq!(columns[1]["tasks"][0]["content"], "a");
    assert_eq!(columns[0]["default"], true);
}

#[test]
fn test_config_show_and_set() {
    let env = TestEnv::signed_in();
    let v = env.run_ok(&["config", "show"]);
    assert_eq!(v["data"]["compact_source_on_move"], false);
    let v = env.run_ok(&["config", "set", "compact-source-on-move", "true"]);
    assert_eq!(v["data"]["compact_source_on_move"], true);
    // The session survives config edits.
    assert_eq!(v["data"]["signed_in"], true);
}

#[test]
fn test_text_output_board() {
    let env = TestEnv::signed_in();
    env.add_task("write docs", "to-do");
    env.cmd()
        .arg("board")
        .assert()
        .success()
        .stdout(predicate::str::contains("[to-do] 1"))
        .stdout(predicate::str::contains("write docs"));
}

#[test]
fn test_text_output_error_exit_code() {
    let env = TestEnv::signed_in();
    env.cmd()
        .args(["column", "delete", "to-do"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Cannot delete default statuses!"));
}

#[test]
fn test_help_mentions_ordering_rules() {
    let env = TestEnv::new();
    env.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ORDERING RULES"));
}
