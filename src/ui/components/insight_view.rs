use chrono::Local;

use crate::common::{DailyTransit, Portrait};

pub fn render_insight(insight: &DailyTransit) -> String {
    let date = Local::now().format("%A, %B %-d, %Y").to_string().to_uppercase();
    let cards = [
        ("Pro Tip", &insight.pro_tip),
        ("Current Mood", &insight.mood_word),
        ("The Tension", &insight.the_tension),
        ("The Shift", &insight.the_shift),
    ];

    let mut out = format!("{date}\n\n{}\n", insight.headline);
    for (title, content) in cards {
        out.push_str(&format!("\n== {title} ==\n{content}\n"));
    }
    out
}

pub fn render_portrait(portrait: &Portrait) -> String {
    let mut out = String::new();
    for (title, section) in portrait.sections() {
        out.push_str(&format!("== {title} ==\n{}\n\n{}\n\n", section.summary, section.content));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::PortraitSection;

    #[test]
    fn insight_lists_every_card() {
        let text = render_insight(&DailyTransit {
            headline: "Headline".into(),
            mood_word: "Mood".into(),
            the_tension: "Tension".into(),
            the_shift: "Shift".into(),
            pro_tip: "Tip".into(),
        });
        for expected in ["Headline", "== Pro Tip ==\nTip", "Mood", "Tension", "Shift"] {
            assert!(text.contains(expected), "missing {expected}");
        }
    }

    #[test]
    fn portrait_lists_sections_in_order() {
        let section = |s: &str| PortraitSection {
            summary: s.into(),
            content: format!("{s} detail"),
        };
        let text = render_portrait(&Portrait {
            core_identity: section("core"),
            psychological_dynamics: section("psyche"),
            drive_career_values: section("drive"),
            growth_pathway: section("growth"),
        });

        let core = text.find("Core Identity").unwrap();
        let growth = text.find("Growth Pathway").unwrap();
        assert!(core < growth);
        assert!(text.contains("psyche detail"));
    }
}
