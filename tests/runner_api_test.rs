//! Integration tests for running steps through the public API.

use sheryl::config::parse_config;
use sheryl::logging::{Level, MemorySink};
use sheryl::runner::{Orchestrator, RunPlan, RunReport};
use sheryl::shell::CancelToken;
use sheryl::steps::{FieldValue, StepStatus};
use sheryl::SherylError;
use std::path::Path;
use std::time::{Duration, Instant};

fn prepare(yaml: &str) -> RunPlan {
    let config = parse_config(yaml, Path::new("sheryl.yml")).unwrap();
    RunPlan::prepare(&config, Vec::new(), false).unwrap()
}

fn run(plan: &mut RunPlan) -> (RunReport, MemorySink) {
    let mut sink = MemorySink::new();
    let report = Orchestrator::new(&mut sink, CancelToken::new()).run(plan);
    (report, sink)
}

#[test]
fn output_flows_into_next_step() {
    let mut plan = prepare(
        r#"
steps:
  - name: a
    cmd: echo hi
  - name: b
    cmd: "echo {{.a.output}}"
"#,
    );

    let (report, sink) = run(&mut plan);

    assert!(report.success());
    assert_eq!(report.exit_code(), 0);
    assert_eq!(plan.steps[0].output.as_deref(), Some("hi\n"));
    assert_eq!(plan.steps[1].cmd, "echo hi\n");
    assert_eq!(plan.steps[1].output.as_deref(), Some("hi\n"));

    let summary = sink.last().unwrap();
    assert_eq!(summary.message, "summary");
    assert_eq!(
        summary.field("success"),
        Some(&FieldValue::Text("2/2".to_string()))
    );
}

#[test]
fn exhausted_retries_halt_the_run() {
    let mut plan = prepare(
        r#"
steps:
  - name: flaky
    cmd: exit 1
    retries: 2
    interval: 10ms
  - name: never
    cmd: echo unreachable
"#,
    );

    let start = Instant::now();
    let (report, sink) = run(&mut plan);

    assert!(!report.success());
    assert_eq!(report.exit_code(), 1);
    assert!(start.elapsed() >= Duration::from_millis(20));

    let flaky = &plan.steps[0];
    assert!(flaky.failed);
    assert_eq!(flaky.attempts, 3);
    assert_eq!(flaky.status, StepStatus::Failed);

    let never = &plan.steps[1];
    assert_eq!(never.status, StepStatus::Pending);
    assert!(never.output.is_none());
    assert!(never.pid.is_none());

    let attempts: Vec<_> = sink
        .events()
        .iter()
        .filter(|e| e.message.contains("attempt"))
        .collect();
    assert_eq!(attempts.len(), 3);
    let levels: Vec<_> = attempts.iter().map(|e| e.level).collect();
    assert_eq!(levels, vec![Level::Warn, Level::Warn, Level::Error]);
    assert_eq!(
        sink.last().unwrap().field("success"),
        Some(&FieldValue::Text("0/2".to_string()))
    );
}

#[test]
fn registry_holds_finished_steps() {
    let mut plan = prepare(
        r#"
steps:
  - name: Ok
    cmd: echo fine
  - name: Bad
    cmd: exit 7
"#,
    );

    let (report, _) = run(&mut plan);

    let ok = report.registry.get("ok").unwrap();
    assert_eq!(ok.output.as_deref(), Some("fine\n"));
    assert!(!ok.failed);

    let bad = report.registry.get("BAD").unwrap();
    assert!(bad.failed);
    assert!(bad.output.is_none());
    assert!(matches!(
        report.failure.unwrap().error,
        SherylError::CommandFailed { code: Some(7), .. }
    ));
}

#[test]
fn reference_to_later_step_fails_without_spawning() {
    let mut plan = prepare(
        r#"
steps:
  - name: early
    cmd: "echo {{ .late.output }}"
    retries: 3
  - name: late
    cmd: echo late
"#,
    );

    let (report, _) = run(&mut plan);

    let failure = report.failure.unwrap();
    assert_eq!(failure.step, "early");
    assert!(matches!(failure.error, SherylError::Template { .. }));
    assert!(plan.steps[0].pid.is_none());
    assert_eq!(plan.steps[0].attempts, 1);
    assert_eq!(plan.steps[1].status, StepStatus::Pending);
}

#[test]
fn retries_render_from_the_template_each_time() {
    let mut plan = prepare(
        r#"
steps:
  - name: a
    cmd: echo first
  - name: b
    cmd: "test -z '{{ .a.name }}' || exit 3"
    retries: 1
"#,
    );

    let (report, _) = run(&mut plan);

    assert!(!report.success());
    assert_eq!(plan.steps[1].attempts, 2);
    assert_eq!(plan.steps[1].cmd, "test -z 'a' || exit 3");
}

#[test]
fn config_env_reaches_commands() {
    let mut plan = prepare(
        r#"
env:
  greeting: hello
steps:
  - name: greet
    cmd: echo $GREETING
"#,
    );

    let (report, _) = run(&mut plan);

    assert!(report.success());
    assert_eq!(plan.steps[0].output.as_deref(), Some("hello\n"));
}

#[test]
fn delay_is_paid_before_each_attempt() {
    let mut plan = prepare(
        r#"
steps:
  - name: slow
    cmd: exit 1
    delay: 15ms
    retries: 1
"#,
    );

    let start = Instant::now();
    let (report, _) = run(&mut plan);

    assert!(!report.success());
    assert!(start.elapsed() >= Duration::from_millis(30));
}

#[test]
fn interrupted_run_reports_cancellation() {
    let mut plan = prepare(
        r#"
steps:
  - name: spin
    cmd: "while :; do :; done"
"#,
    );
    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    let handle = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(50));
        trigger.cancel();
    });

    let mut sink = MemorySink::new();
    let report = Orchestrator::new(&mut sink, cancel).run(&mut plan);
    handle.join().unwrap();

    assert!(report.interrupted());
    assert_eq!(report.exit_code(), 130);
    assert!(plan.steps[0].failed);
}
