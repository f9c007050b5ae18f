use ddf_parse::{DdfError, Diagnostics, Policy, ReadInfo, Report, ThingDb, ThingParser, read_ddf};
use ddf_types::{NextRef, ThingAction, ThingStarter};

fn read(db: &mut ThingDb, input: &str) -> Result<Report, DdfError> {
    read_with(db, input, Policy::default())
}

fn read_with(db: &mut ThingDb, input: &str, policy: Policy) -> Result<Report, DdfError> {
    let info = ReadInfo::new("THINGS", "things.ddf");
    let mut parser = ThingParser::new(db);
    read_ddf(input, &info, &mut parser, policy)
}

const IMP: &str = r#"<THINGS>
[IMP:3001]
STATES(SPAWN)="TROO:A:10:NORMAL:LOOKOUT","TROO:B:10:NORMAL:LOOKOUT:SPAWN";
"#;

#[test]
fn extend_keeps_states_and_updates_fields() {
    let mut db = ThingDb::new();
    let report = read(&mut db, IMP).expect("imp");
    assert_eq!(report.entries, 1);
    // the sixth part of the second frame is ignored
    assert_eq!(report.warnings.len(), 1);

    read(&mut db, "<THINGS>\n[++IMP]\nSPAWNHEALTH=70;\n").expect("extend");
    assert_eq!(db.things.len(), 1);
    let imp = db.lookup("IMP").expect("imp");
    assert_eq!(imp.spawnhealth, 70.0);
    assert_eq!(imp.number, 3001);
    assert_eq!(imp.states.len(), 3);
    assert_eq!(imp.states.get(2).map(|s| s.next), Some(NextRef::Resolved(1)));
    assert_eq!(imp.states.get(1).and_then(|s| s.action), Some(ThingAction::Lookout));
    assert_eq!(imp.state(ThingStarter::Spawn), 1);
}

#[test]
fn replace_resets_to_defaults() {
    let mut db = ThingDb::new();
    read(&mut db, "<THINGS>[DEMON:3002]SPAWNHEALTH=150;SPEED=10;[SHOTGUY]").expect("first");
    read(&mut db, "<THINGS>[DEMON:3002]SPEED=12;").expect("second");
    assert_eq!(db.things.len(), 2);
    let demon = db.lookup("DEMON").expect("demon");
    assert_eq!((demon.spawnhealth, demon.speed), (1000.0, 12.0));
    // a replaced entry moves to the end
    assert_eq!(db.things.all().last().map(|t| t.name.as_str()), Some("DEMON"));
}

#[test]
fn extending_unknown_entry_is_fatal() {
    let mut db = ThingDb::new();
    let err = read(&mut db, "<THINGS>[++CYBERDEMON]SPEED=1;").expect_err("unknown");
    assert_eq!(err.message(), "Unknown thing to extend: CYBERDEMON");
    assert!(db.things.is_empty());
}

#[test]
fn clearall_hides_earlier_things() {
    let mut db = ThingDb::new();
    read(&mut db, IMP).expect("imp");
    read(&mut db, "<THINGS>\n#CLEARALL\n[BARREL:2035]\n").expect("clear");
    assert!(db.lookup("IMP").is_none());
    assert!(db.things.lookup_number(3001).is_none());
    assert!(db.lookup("BARREL").is_some());
    assert_eq!(db.things.all().len(), 2);
    assert!(read(&mut db, "<THINGS>[++IMP]SPEED=1;").is_err());
}

#[test]
fn failed_entry_leaves_record_untouched() {
    let mut db = ThingDb::new();
    read(&mut db, IMP).expect("imp");
    let before = db.lookup("IMP").cloned().expect("imp");
    let err = read(&mut db, "<THINGS>[++IMP]SPAWNHEALTH=5;STATES(PAIN)=TROO:H:2:NORMAL:,#NOWHERE;")
        .expect_err("bad redirect");
    assert!(err.message().contains("NOWHERE"));
    assert_eq!(db.lookup("IMP"), Some(&before));
}

#[test]
fn strict_and_lax_policies() {
    let input = "<THINGS>[IMP]SPECIAL=WIBBLE;";
    let mut db = ThingDb::new();
    let report = read(&mut db, input).expect("lenient");
    assert_eq!(report.warnings[0].msg, "Unknown special 'WIBBLE'");

    let strict = Policy {
        strict_errors: true,
        ..Policy::default()
    };
    assert!(read_with(&mut ThingDb::new(), input, strict).is_err());

    let quiet = Policy {
        no_warnings: true,
        ..Policy::default()
    };
    let report = read_with(&mut ThingDb::new(), input, quiet).expect("quiet");
    assert!(report.warnings.is_empty());
}

#[test]
fn macros_feed_fields() {
    let mut db = ThingDb::new();
    read(
        &mut db,
        "<THINGS>\n#DEFINE TOUGH 400\n#DEFINE IMP_SPAWN \"TROO:A:10:NORMAL:LOOKOUT\"\n[BRUISER]\nSPAWNHEALTH=TOUGH;\n",
    )
    .expect("read");
    assert_eq!(db.lookup("BRUISER").map(|t| t.spawnhealth), Some(400.0));
}

#[test]
fn warnings_carry_location() {
    let mut db = ThingDb::new();
    let report = read(&mut db, "<THINGS>\n[IMP]\n\nSPECIAL=WIBBLE;\n").expect("lenient");
    let w = &report.warnings[0];
    assert_eq!(w.loc.line, 4);
    assert_eq!(w.loc.entry.as_deref(), Some("[IMP]"));
    assert_eq!(w.loc.line_text, "SPECIAL=WIBBLE;");
}

#[test]
fn unknown_references_follow_lax_policy() {
    let input = "<THINGS>\n[ZOMBIE]\nDROPITEM=CLIP;\nBLOOD=GREEN_BLOOD;\n[GREEN_BLOOD]\n";

    let mut db = ThingDb::new();
    read(&mut db, input).expect("read");
    let mut diag = Diagnostics::new("things", Policy::default());
    let err = db.link_references(&mut diag).expect_err("unknown drop item");
    assert_eq!(err.message(), "Unknown thing type: CLIP");
    assert_eq!(err.location().entry.as_deref(), Some("[ZOMBIE]"));

    let lax = Policy {
        lax_errors: true,
        ..Policy::default()
    };
    let mut db = ThingDb::new();
    read_with(&mut db, input, lax).expect("read");
    let mut diag = Diagnostics::new("things", lax);
    db.link_references(&mut diag).expect("lax");
    let msgs: Vec<&str> = diag.warnings().iter().map(|w| w.msg.as_str()).collect();
    assert_eq!(msgs, ["Unknown thing type: CLIP"]);
    let zombie = db.lookup("ZOMBIE").expect("zombie");
    assert_eq!(zombie.dropitem, None);
    assert_eq!(zombie.blood.as_deref(), Some("GREEN_BLOOD"));
}

#[test]
fn non_ascii_colour_is_an_error() {
    let mut db = ThingDb::new();
    let err = read(&mut db, "<THINGS>\n[LAMP]\nDLIGHT.COLOUR=\"#A\u{e9}1234\";\n")
        .expect_err("bad colour");
    assert_eq!(err.location().line, 3);
    assert!(db.lookup("LAMP").is_none());
}
