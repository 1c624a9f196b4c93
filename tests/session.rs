use road_inspector::session::state::Panel;
use road_inspector::ClockPlayer;
use road_inspector::Criteria;
use road_inspector::Reply;
use road_inspector::Session;
use road_inspector::VideoId;

const SURVEY: &str = "\
NHAI network survey,,,
Chainage,L1 Lane Roughness BI (in mm/km),L2 Rut Depth (in mm),R3 Rut Depth (in mm)
0,2450,5.1,9
10,2439,5.0,9
20,1200,6.0,9
30,1100,n/a,9
";

fn text(reply: Reply) -> String {
    match reply {
        Reply::Text(text) => text,
        Reply::Quit => panic!("unexpected quit"),
    }
}

#[test]
fn inspection_run_from_the_prompt() {
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("survey.csv");
    std::fs::write(&path, SURVEY).unwrap();

    let mut session: Session<ClockPlayer> = Session::new(Criteria::default());
    let loaded = text(session.execute_line(&format!(r#"load "{}""#, path.display())).unwrap());
    assert!(loaded.starts_with("Loaded 6 rows"), "{}", loaded);

    assert_eq!(
        text(session.execute_line("frame 0").unwrap()),
        "Frame 0 — Violations found:\n\
         L1 Lane Roughness BI (in mm/km): 2450 ≥ 2440\n\
         L2 Rut Depth (in mm): 5.1 ≥ 5.1"
    );
    assert_eq!(session.panel(), Panel::Frame);
    assert_eq!(text(session.execute_line("frame 1").unwrap()), "Frame 1 — No threshold violations.");
    assert_eq!(text(session.execute_line("frame 4").unwrap()), "Frame out of range.");

    assert_eq!(
        text(session.execute_line("summary").unwrap()),
        "L1 Lane Roughness BI (in mm/km): 2440\nL2 Rut Depth (in mm): 5.1"
    );
    assert_eq!(session.panel(), Panel::Analysis);
    assert_eq!(
        text(session.execute_line(r#"count "L2 Rut Depth (in mm)""#).unwrap()),
        "Cells >= threshold (5.1): 2"
    );
    assert_eq!(
        text(session.execute_line(r#"count "L2 Rut Depth (in mm)" 5.1"#).unwrap()),
        "Cells >= 5.1: 2"
    );
    assert_eq!(
        text(session.execute_line(r#"count "R3 Rut Depth (in mm)""#).unwrap()),
        "No threshold defined for this column."
    );
    assert_eq!(
        text(session.execute_line(r#"count "R3 Rut Depth (in mm)" 9"#).unwrap()),
        "Cells >= 9: 4"
    );
    assert_eq!(
        text(session.execute_line("count Chainage").unwrap()),
        "Column not in analysis list."
    );
    assert_eq!(session.execute_line("quit").unwrap(), Reply::Quit);
}

#[test]
fn failed_load_keeps_the_previous_sheet() {
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("survey.csv");
    std::fs::write(&path, SURVEY).unwrap();

    let mut session: Session<ClockPlayer> = Session::new(Criteria::default());
    session.load_file(path.to_str().unwrap()).unwrap();

    let error = session.execute_line("load survey.pdf").unwrap_err();
    assert_eq!(error.to_string(), "Unsupported file type 'survey.pdf'. Please upload .csv or .xlsx");
    assert!(session.load_file("missing.csv").is_err());

    assert_eq!(session.store().len(), 6);
    assert_eq!(text(session.execute_line("frame 3").unwrap()), "Frame 3 — No threshold violations.");
}

#[test]
fn bookmarks_and_playback() {
    let mut session: Session<ClockPlayer> = Session::new(Criteria::default());
    session.attach_video(VideoId::First, ClockPlayer::new("left.mp4"));
    session.attach_video(VideoId::Second, ClockPlayer::new("right.mp4"));

    session.execute_line("seek 1 125").unwrap();
    session.execute_line("seek 2 4000.9").unwrap();
    session.execute_line("label pothole near median").unwrap();
    assert_eq!(
        text(session.execute_line("bookmark 1").unwrap()),
        "Bookmarked Video 1 — 00:02:05 — pothole near median"
    );
    assert_eq!(
        text(session.execute_line("bookmark 2").unwrap()),
        "Bookmarked Video 2 — 01:06:40 — (no label)"
    );

    session.execute_line("note 2 check the right lane").unwrap();
    let first_id = session.bookmarks()[0].id;
    assert!(session.update_note_by_id(first_id, "reported"));
    assert_eq!(
        text(session.execute_line("bookmarks").unwrap()),
        "1. Video 1 — 00:02:05 — pothole near median\n   reported\n\
         2. Video 2 — 01:06:40 — (no label)\n   check the right lane"
    );

    assert_eq!(text(session.execute_line("play").unwrap()), "Playing both videos.");
    assert_eq!(text(session.execute_line("play").unwrap()), "Paused both videos.");
}
