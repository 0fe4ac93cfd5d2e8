use gazeline::{FrameView, TimeMs, parse_session_document};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let s = include_str!("../tests/data/demo_session.json");
    let loaded = parse_session_document(s)?;

    println!(
        "{}: {} fixations over {}",
        loaded.source.path,
        loaded.session.records().len(),
        loaded.session.total_duration()
    );
    for t in [0.0, 450.0, 1000.0, 1550.0, 1700.0, 2599.0] {
        let view = FrameView::at(&loaded.session, TimeMs(t));
        println!(
            "t={t}ms: {} visible, active: {:?}",
            view.visible.len(),
            view.active.map(|f| f.value.as_str())
        );
    }

    Ok(())
}
