//! End-to-end cycle tests against a fake solver executable.
//!
//! The fake solver is a shell script that copies a canned artifact for the
//! requested start date into the region's output directory and drops the
//! matching qinit file, mimicking the real solver's side effects. A
//! `fail_marker` file in a region's input directory makes it exit nonzero.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rf_core::{format_stamp, next_day, parse_stamp};
use rf_records::ledger::LEDGER_FILE;
use rf_workflow::{
    run_cycle, CycleConfig, CyclePaths, CycleReport, RegionOutcome, RegionReport, RunnerStage,
    SkipReason,
};
use tempfile::{tempdir, TempDir};

const SOLVER_SCRIPT: &str = r#"#!/bin/sh
input_dir="$1"
output_dir="$5"
start="$6"
if [ -e "$input_dir/fail_marker" ]; then
  exit 9
fi
found=0
for f in __CANNED__/qout_"$start"to*.csv; do
  [ -e "$f" ] || continue
  cp "$f" "$output_dir"/
  base=$(basename "$f" .csv)
  : > "$input_dir/qinit_${base#qout_}.csv"
  found=1
done
[ "$found" -eq 1 ] || exit 4
"#;

struct Fixture {
    root: TempDir,
}

impl Fixture {
    fn new(regions: &[&str], ledger_stamp: &str) -> Self {
        let fixture = Self {
            root: tempdir().unwrap(),
        };
        for region in regions {
            let input = fixture.input_dir(region);
            fs::create_dir_all(&input).unwrap();
            fs::write(input.join("weight_table.csv"), b"101,0.5\n102,0.5\n").unwrap();
        }
        for dir in ["runoff", "ledger", "records", "canned"] {
            fs::create_dir_all(fixture.root.path().join(dir)).unwrap();
        }
        fs::write(
            fixture.root.path().join("ledger").join(LEDGER_FILE),
            format!("{ledger_stamp}\n"),
        )
        .unwrap();

        let script = SOLVER_SCRIPT.replace(
            "__CANNED__",
            &fixture.root.path().join("canned").display().to_string(),
        );
        let exe = fixture.solver_exe();
        fs::write(&exe, script).unwrap();
        let mut perms = fs::metadata(&exe).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&exe, perms).unwrap();
        fixture
    }

    fn solver_exe(&self) -> PathBuf {
        self.root.path().join("fake_solver.sh")
    }

    fn input_dir(&self, region: &str) -> PathBuf {
        self.root.path().join("io/input").join(region)
    }

    fn seed_qinit(&self, region: &str, token: &str) {
        fs::write(self.input_dir(region).join(format!("qinit_{token}.csv")), b"").unwrap();
    }

    fn add_runoff(&self, from: &str, to: &str) {
        let mut date = parse_stamp(from).unwrap();
        let end = parse_stamp(to).unwrap();
        while date <= end {
            let name = format!("runoff_{}.nc", format_stamp(date));
            fs::write(self.root.path().join("runoff").join(name), b"").unwrap();
            date = next_day(date);
        }
    }

    /// Canned artifact the fake solver will "produce": one row of discharge
    /// per day over `token`'s range.
    fn add_canned_artifact(&self, token: &str) {
        let (start, end) = token.split_at(8);
        let mut date = parse_stamp(start).unwrap();
        let last = parse_stamp(end.strip_prefix("to").unwrap()).unwrap();
        let mut rows = String::new();
        let mut flow = 1.0;
        while date <= last {
            rows.push_str(&format!("{},{flow},{}\n", format_stamp(date), flow * 2.0));
            flow += 1.0;
            date = next_day(date);
        }
        fs::write(
            self.root.path().join("canned").join(format!("qout_{token}.csv")),
            rows,
        )
        .unwrap();
    }

    fn record_path(&self, region: &str, year: i32) -> PathBuf {
        self.root
            .path()
            .join("records")
            .join(region)
            .join(format!("qout_record_{year}.csv"))
    }

    fn paths(&self) -> CyclePaths {
        CyclePaths {
            solver_exe: self.solver_exe(),
            runoff_dir: self.root.path().join("runoff"),
            io_root: self.root.path().join("io"),
            ledger_dir: self.root.path().join("ledger"),
            records_root: self.root.path().join("records"),
        }
    }

    fn config(&self) -> CycleConfig {
        CycleConfig {
            solver_timeout: Duration::from_secs(30),
            ..CycleConfig::default()
        }
    }

    fn run(&self) -> CycleReport {
        run_cycle(&self.paths(), &self.config()).unwrap()
    }
}

fn outcome<'a>(report: &'a CycleReport, region: &str) -> &'a RegionReport {
    report
        .regions
        .iter()
        .find(|r| r.region == region)
        .unwrap_or_else(|| panic!("no report for {region}"))
}

fn record_lines(path: &Path) -> usize {
    fs::read_to_string(path).unwrap().lines().count()
}

#[test]
fn full_cycle_merges_all_regions_and_advances_the_ledger() {
    let fx = Fixture::new(&["amazonas", "magdalena"], "20181231");
    fx.seed_qinit("amazonas", "19790101to20181231");
    fx.seed_qinit("magdalena", "19790101to20181231");
    fx.add_runoff("20190101", "20190104");
    fx.add_canned_artifact("20190101to20190104");

    let config = CycleConfig {
        jobs: 2,
        ..fx.config()
    };
    let report = run_cycle(&fx.paths(), &config).unwrap();

    let end = parse_stamp("20190104").unwrap();
    for region in ["amazonas", "magdalena"] {
        assert_eq!(
            outcome(&report, region).outcome,
            RegionOutcome::Done { end_date: end }
        );
        assert_eq!(record_lines(&fx.record_path(region, 2019)), 4);
    }
    assert!(report.advanced);
    assert_eq!(report.ledger_after, end);
    assert_eq!(
        fs::read_to_string(fx.root.path().join("ledger").join(LEDGER_FILE))
            .unwrap()
            .trim(),
        "20190104"
    );
    assert!(fx
        .root
        .path()
        .join("ledger")
        .join("cycle_report.json")
        .is_file());
}

#[test]
fn rerun_with_no_new_data_is_idempotent() {
    let fx = Fixture::new(&["amazonas"], "20181231");
    fx.seed_qinit("amazonas", "19790101to20181231");
    fx.add_runoff("20190101", "20190103");
    fx.add_canned_artifact("20190101to20190103");

    let first = fx.run();
    assert!(first.advanced);
    let record_before = fs::read(fx.record_path("amazonas", 2019)).unwrap();

    let second = fx.run();
    assert_eq!(
        outcome(&second, "amazonas").outcome,
        RegionOutcome::Skipped {
            reason: SkipReason::NoNewData
        }
    );
    assert!(!second.advanced);
    assert_eq!(second.ledger_after, parse_stamp("20190103").unwrap());
    assert_eq!(
        fs::read(fx.record_path("amazonas", 2019)).unwrap(),
        record_before,
        "idempotent rerun must not touch the record"
    );
}

#[test]
fn partial_progress_short_of_the_request_is_accepted() {
    // forcing runs to 0104 but the solver only got to 0103
    let fx = Fixture::new(&["amazonas"], "20181231");
    fx.seed_qinit("amazonas", "19790101to20181231");
    fx.add_runoff("20190101", "20190104");
    fx.add_canned_artifact("20190101to20190103");

    let report = fx.run();
    assert_eq!(
        outcome(&report, "amazonas").outcome,
        RegionOutcome::Done {
            end_date: parse_stamp("20190103").unwrap()
        }
    );
    assert_eq!(report.ledger_after, parse_stamp("20190103").unwrap());
}

#[test]
fn failed_region_holds_the_ledger_but_not_its_siblings() {
    let fx = Fixture::new(&["amazonas", "magdalena"], "20181231");
    fx.seed_qinit("amazonas", "19790101to20181231");
    fx.seed_qinit("magdalena", "19790101to20181231");
    fx.add_runoff("20190101", "20190104");
    fx.add_canned_artifact("20190101to20190104");
    fs::write(fx.input_dir("magdalena").join("fail_marker"), b"").unwrap();

    let report = fx.run();

    // amazonas merged, magdalena failed, ledger held
    assert_eq!(
        outcome(&report, "amazonas").outcome,
        RegionOutcome::Done {
            end_date: parse_stamp("20190104").unwrap()
        }
    );
    match &outcome(&report, "magdalena").outcome {
        RegionOutcome::Failed { stage, .. } => assert_eq!(*stage, RunnerStage::Invoking),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(!report.advanced);
    assert_eq!(report.ledger_after, parse_stamp("20181231").unwrap());
    assert!(fx.record_path("amazonas", 2019).exists());
    assert!(!fx.record_path("magdalena", 2019).exists());

    // retry after the failure is repaired: magdalena catches up from the
    // ledger, amazonas resumes from its own state and merely skips
    fs::remove_file(fx.input_dir("magdalena").join("fail_marker")).unwrap();
    let amazonas_before = fs::read(fx.record_path("amazonas", 2019)).unwrap();
    let retry = fx.run();

    assert_eq!(
        outcome(&retry, "magdalena").outcome,
        RegionOutcome::Done {
            end_date: parse_stamp("20190104").unwrap()
        }
    );
    assert_eq!(
        outcome(&retry, "amazonas").outcome,
        RegionOutcome::Skipped {
            reason: SkipReason::NoNewData
        }
    );
    assert!(retry.advanced);
    assert_eq!(retry.ledger_after, parse_stamp("20190104").unwrap());
    assert_eq!(
        fs::read(fx.record_path("amazonas", 2019)).unwrap(),
        amazonas_before,
        "retry must not re-merge the already-complete region"
    );
    assert_eq!(record_lines(&fx.record_path("magdalena", 2019)), 4);
}

#[test]
fn missing_initial_condition_fails_only_that_region() {
    let fx = Fixture::new(&["amazonas", "magdalena"], "20181231");
    fx.seed_qinit("amazonas", "19790101to20181231");
    // magdalena has no qinit at all
    fx.add_runoff("20190101", "20190102");
    fx.add_canned_artifact("20190101to20190102");

    let report = fx.run();
    assert!(matches!(
        outcome(&report, "magdalena").outcome,
        RegionOutcome::Failed {
            stage: RunnerStage::LocatingInitCondition,
            ..
        }
    ));
    assert!(matches!(
        outcome(&report, "amazonas").outcome,
        RegionOutcome::Done { .. }
    ));
    assert!(!report.advanced);
}

#[test]
fn overlapping_merge_is_a_discontinuity_and_leaves_the_record_alone() {
    let fx = Fixture::new(&["amazonas"], "20190101");
    fx.seed_qinit("amazonas", "19790101to20190101");
    fx.add_runoff("20190102", "20190103");
    fx.add_canned_artifact("20190102to20190103");

    // record is already ahead of the qinit chain: the artifact's first day
    // collides with the record's last
    let region_records = fx.root.path().join("records/amazonas");
    fs::create_dir_all(&region_records).unwrap();
    let record_path = fx.record_path("amazonas", 2019);
    fs::write(&record_path, "20190101,1,2\n20190102,2,4\n").unwrap();
    let before = fs::read(&record_path).unwrap();

    let report = fx.run();
    assert!(matches!(
        outcome(&report, "amazonas").outcome,
        RegionOutcome::Failed {
            stage: RunnerStage::Merging,
            ..
        }
    ));
    assert!(!report.advanced);
    assert_eq!(fs::read(&record_path).unwrap(), before);
}

#[test]
fn year_rollover_artifact_lands_in_the_new_years_record() {
    let fx = Fixture::new(&["amazonas"], "20181224");
    fx.seed_qinit("amazonas", "19790101to20181224");
    fx.add_runoff("20181225", "20190105");
    fx.add_canned_artifact("20181225to20190105");

    let report = fx.run();
    assert_eq!(
        outcome(&report, "amazonas").outcome,
        RegionOutcome::Done {
            end_date: parse_stamp("20190105").unwrap()
        }
    );
    assert_eq!(report.ledger_after, parse_stamp("20190105").unwrap());
    assert!(!fx.record_path("amazonas", 2018).exists());
    let record = fs::read_to_string(fx.record_path("amazonas", 2019)).unwrap();
    assert!(record.starts_with("20181225,"));
    assert_eq!(record.lines().count(), 12);
}

#[test]
fn missing_ledger_marker_fails_before_any_region_runs() {
    let fx = Fixture::new(&["amazonas"], "20181231");
    fx.seed_qinit("amazonas", "19790101to20181231");
    fx.add_runoff("20190101", "20190102");
    fx.add_canned_artifact("20190101to20190102");
    fs::remove_file(fx.root.path().join("ledger").join(LEDGER_FILE)).unwrap();

    let err = run_cycle(&fx.paths(), &fx.config()).unwrap_err();
    assert!(err.to_string().contains("Ledger marker"));
    assert!(
        !fx.root.path().join("io/output/amazonas").exists(),
        "no region may be touched without a ledger"
    );
}
