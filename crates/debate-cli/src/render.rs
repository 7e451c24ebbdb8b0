//! Terminal output. Everything here goes to stdout; logs go to stderr.

use debate_core::{Applied, DebateSession, NormalizedVerdict, PerSide, Persona, Side};

const RULE_WIDTH: usize = 50;

pub fn personas() {
    for persona in Persona::ALL {
        println!("{:<20} {}", persona.wire_name(), persona.description());
    }
}

/// Print whatever a just-applied delivery added to the session.
pub fn on_update(session: &DebateSession, applied: &Applied) {
    match applied {
        Applied::Utterance(id) => {
            if let Some(utterance) = session
                .transcript()
                .utterances()
                .iter()
                .rev()
                .find(|u| u.id == *id)
            {
                println!("\n[{}]:", utterance.speaker);
                println!("{}", utterance.text);
                println!("{}", "-".repeat(RULE_WIDTH));
            }
        }
        Applied::Verdict { .. } => {
            if let Some(verdict) = session.verdict() {
                print!("{}", verdict_block(verdict));
            }
        }
        Applied::VerdictRejected => println!("\n[judge output could not be read]"),
        Applied::Ignored | Applied::Finished | Applied::Failed(_) => {}
    }
}

pub fn verdict_block(verdict: &NormalizedVerdict) -> String {
    let banner = "=".repeat(20);
    let mut out = format!("\n{banner} JUDGE VERDICT {banner}\n");
    out.push_str(&format!("WINNER:   {}\n", verdict.winning_side));
    out.push_str(&format!("SUMMARY:  {}\n", verdict.summary));
    out.push_str(&format!("REASON:   {}\n", verdict.rationale));

    out.push_str("\nSCORES:\n");
    for side in Side::ALL {
        let card = verdict.score(side);
        out.push_str(&format!(
            "  {side}: logic {} | persuasion {} | aggression {} | final {}\n",
            card.logic,
            card.persuasion,
            card.aggression,
            card.final_score()
        ));
    }

    list_section(&mut out, "KEY POINTS", &verdict.key_points, "*");
    list_section(&mut out, "STRENGTHS", &verdict.strengths, "+");
    list_section(&mut out, "WEAKNESSES", &verdict.weaknesses, "-");

    out.push_str(&format!("\nFINAL VERDICT: {}\n", verdict.conclusion));
    out.push_str(&"=".repeat(55));
    out.push('\n');
    out
}

fn list_section(out: &mut String, title: &str, lists: &PerSide<Vec<String>>, bullet: &str) {
    out.push_str(&format!("\n{title}:\n"));
    for side in Side::ALL {
        let items = lists.get(side);
        if items.is_empty() {
            out.push_str(&format!("  {side}: No data\n"));
            continue;
        }
        out.push_str(&format!("  {side}:\n"));
        for item in items {
            out.push_str(&format!("    {bullet} {item}\n"));
        }
    }
}
