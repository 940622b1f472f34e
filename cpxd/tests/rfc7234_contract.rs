//! RFC 7234 §4 reuse contract tests against the public `cpxd::cache` surface and the
//! `cpxd eval` binary.

use anyhow::{anyhow, Context, Result};
use cpx_core::config::{parse_config_str, ComplianceMode, MaxStaleSource};
use cpxd::cache::{
    load_request, load_stored, CacheRequest, Reuse, ReuseEvaluator, StoredResponse,
};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const T0_SECS: u64 = 1_700_000_000;

fn t0() -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(T0_SECS)
}

fn at(secs: u64) -> SystemTime {
    t0() + Duration::from_secs(secs)
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

fn header_map(pairs: &[(&str, &str)]) -> http::HeaderMap {
    let mut map = http::HeaderMap::new();
    for (name, value) in pairs {
        map.append(
            http::HeaderName::from_bytes(name.as_bytes()).expect("name"),
            http::HeaderValue::from_str(value).expect("value"),
        );
    }
    map
}

fn stored_with(cache_control: &str, extra: &[(&str, &str)]) -> StoredResponse {
    let date = httpdate::fmt_http_date(t0());
    let mut pairs = vec![("date", date.as_str()), ("cache-control", cache_control)];
    pairs.extend_from_slice(extra);
    StoredResponse::new(http::HeaderMap::new(), header_map(&pairs), t0(), t0())
}

fn eval_stdout(config: &str, request: &str, now: &str, revalidated: bool) -> Result<String> {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cpxd"));
    cmd.arg("eval")
        .arg("--config")
        .arg(fixture(config))
        .arg("--stored")
        .arg(fixture("stored_max_age.json"))
        .arg("--request")
        .arg(fixture(request))
        .arg("--now")
        .arg(now);
    if revalidated {
        cmd.arg("--revalidated");
    }
    let output = cmd.output().context("spawn cpxd")?;
    if !output.status.success() {
        return Err(anyhow!(
            "cpxd eval failed: {}",
            String::from_utf8_lossy(&output.stderr)
        ));
    }
    String::from_utf8(output.stdout).context("stdout utf-8")
}

fn run_eval(request: &str, now: &str, revalidated: bool) -> Result<(String, String)> {
    let stdout = eval_stdout("cpxd.yaml", request, now, revalidated)?;
    let mut verdict = None;
    let mut can_reuse = None;
    for line in stdout.lines() {
        if let Some(v) = line.strip_prefix("verdict: ") {
            verdict = Some(v.to_string());
        } else if let Some(v) = line.strip_prefix("can_reuse: ") {
            can_reuse = Some(v.to_string());
        }
    }
    Ok((
        verdict.ok_or_else(|| anyhow!("missing verdict in {stdout:?}"))?,
        can_reuse.ok_or_else(|| anyhow!("missing can_reuse in {stdout:?}"))?,
    ))
}

#[test]
fn fixture_age_arithmetic_and_min_fresh() -> Result<()> {
    let stored = load_stored(&fixture("stored_max_age.json"))?;
    let plain = load_request(&fixture("request_plain.json"))?;
    let min_fresh = load_request(&fixture("request_min_fresh.json"))?;
    let evaluator = ReuseEvaluator::default();

    // Date=T0, Age=10, request sent at T0-5: current age is 15s + resident time.
    assert_eq!(evaluator.evaluate_at(&plain, &stored, at(20)), Reuse::Can);
    assert_eq!(
        evaluator.evaluate_at(&min_fresh, &stored, at(20)),
        Reuse::MustRevalidate
    );
    assert_eq!(evaluator.evaluate_at(&min_fresh, &stored, at(10)), Reuse::Can);
    // 45s resident brings the age to exactly the 60s lifetime.
    assert_eq!(
        evaluator.evaluate_at(&plain, &stored, at(45)),
        Reuse::MustRevalidateCanStale
    );
    Ok(())
}

#[test]
fn cli_eval_reports_verdicts() -> Result<()> {
    let (verdict, can_reuse) =
        run_eval("request_plain.json", "Tue, 14 Nov 2023 22:13:40 GMT", false)?;
    assert_eq!(verdict, "can");
    assert_eq!(can_reuse, "true");

    let (verdict, can_reuse) =
        run_eval("request_min_fresh.json", "Tue, 14 Nov 2023 22:13:40 GMT", false)?;
    assert_eq!(verdict, "must_revalidate");
    assert_eq!(can_reuse, "false");

    let (verdict, can_reuse) =
        run_eval("request_plain.json", "Tue, 14 Nov 2023 22:14:20 GMT", true)?;
    assert_eq!(verdict, "must_revalidate_can_stale");
    assert_eq!(can_reuse, "true");
    Ok(())
}

#[test]
fn cli_eval_renders_reuse_counters_when_metrics_enabled() -> Result<()> {
    let stdout = eval_stdout(
        "cpxd_metrics.yaml",
        "request_plain.json",
        "Tue, 14 Nov 2023 22:13:40 GMT",
        false,
    )?;
    assert!(stdout.contains("verdict: can"), "{stdout}");
    assert!(
        stdout.contains(r#"cpx_cache_reuse_total{branch="fresh",verdict="can"} 1"#),
        "{stdout}"
    );
    assert!(!stdout.contains("cpx_cache_stale_total"), "{stdout}");
    Ok(())
}

#[test]
fn cli_eval_renders_stale_counters_for_stale_response() -> Result<()> {
    let stdout = eval_stdout(
        "cpxd_metrics.yaml",
        "request_plain.json",
        "Tue, 14 Nov 2023 22:14:20 GMT",
        false,
    )?;
    assert!(stdout.contains("verdict: must_revalidate_can_stale"), "{stdout}");
    assert!(
        stdout.contains(
            r#"cpx_cache_reuse_total{branch="not_fresh",verdict="must_revalidate_can_stale"} 1"#
        ),
        "{stdout}"
    );
    assert!(
        stdout.contains(
            r#"cpx_cache_stale_total{branch="within_max_stale",verdict="must_revalidate_can_stale"} 1"#
        ),
        "{stdout}"
    );
    Ok(())
}

#[test]
fn cli_eval_omits_counters_when_metrics_disabled() -> Result<()> {
    let stdout = eval_stdout(
        "cpxd.yaml",
        "request_plain.json",
        "Tue, 14 Nov 2023 22:13:40 GMT",
        false,
    )?;
    assert!(!stdout.contains("cpx_cache_reuse_total"), "{stdout}");
    Ok(())
}

#[test]
fn cli_check_accepts_fixture_config() -> Result<()> {
    let output = Command::new(env!("CARGO_BIN_EXE_cpxd"))
        .arg("check")
        .arg("--config")
        .arg(fixture("cpxd.yaml"))
        .output()
        .context("spawn cpxd")?;
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "config ok");
    Ok(())
}

#[test]
fn config_selects_compliance_and_max_stale_source() -> Result<()> {
    let config = parse_config_str(
        "version: 1\ncache:\n  compliance: lenient\n  max_stale_source: rfc\n",
    )?;
    assert_eq!(config.cache.compliance, ComplianceMode::Lenient);
    assert_eq!(config.cache.max_stale_source, MaxStaleSource::Rfc);

    let evaluator = ReuseEvaluator::new(&config.cache);
    let stored = stored_with("max-age=60", &[]);
    let pragma = CacheRequest::from_headers(header_map(&[("pragma", "no-cache")]));
    assert_eq!(evaluator.evaluate_at(&pragma, &stored, at(10)), Reuse::Can);

    let bounded = CacheRequest::from_headers(header_map(&[("cache-control", "max-stale=5")]));
    assert_eq!(
        evaluator.evaluate_at(&bounded, &stored, at(64)),
        Reuse::MustRevalidateCanStale
    );
    assert_eq!(
        evaluator.evaluate_at(&bounded, &stored, at(70)),
        Reuse::MustRevalidate
    );
    Ok(())
}

#[test]
fn vary_star_is_never_reused() {
    let stored = stored_with("max-age=3600, public", &[("vary", "*")]);
    let request = CacheRequest::default();
    for compliance in [ComplianceMode::Strict, ComplianceMode::Lenient] {
        let evaluator = ReuseEvaluator::default().with_compliance(compliance);
        assert_eq!(evaluator.evaluate_at(&request, &stored, at(1)), Reuse::Cannot);
        assert!(!evaluator.can_reuse_at(&request, &stored, true, at(1)));
    }
}

#[test]
fn stale_response_with_no_store_is_a_miss() {
    let stored = stored_with("max-age=60, no-store, max-stale=3600", &[]);
    let evaluator = ReuseEvaluator::default();
    assert_eq!(
        evaluator.evaluate_at(&CacheRequest::default(), &stored, at(10)),
        Reuse::Can
    );
    assert_eq!(
        evaluator.evaluate_at(&CacheRequest::default(), &stored, at(61)),
        Reuse::Cannot
    );
}
