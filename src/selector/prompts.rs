//! Prompt text for the summarizer and relevance filter stages

use crate::clock::format_timestamp;
use chrono::{DateTime, Utc};

pub const SUMMARY_QUESTION: &str = "Summarize the statements above.";

/// Wrap rendered component states as the summarizer's statement block
pub fn statements_block(component_states: &str) -> String {
    format!("Statements:\n{}\n", component_states)
}

/// `"<agent>, <summary>"`, prefixed with `"[<time>] "` when a time is known
pub fn build_query(agent_name: &str, summary: &str, now: Option<&DateTime<Utc>>) -> String {
    let query = format!("{}, {}", agent_name, summary);
    match now {
        Some(time) => format!("[{}] {}", format_timestamp(time), query),
        None => query,
    }
}

/// Selection instruction for the relevance filter.
///
/// Conflicts are resolved in favour of the most recent statement. This is
/// only asked of the model; nothing checks that it complied.
pub fn relevance_instruction(agent_name: &str, now: Option<&DateTime<Utc>>) -> String {
    let instruction = format!(
        "Select the subset of the following set of statements that is most \
         important for {agent_name} to consider right now. Whenever two or more \
         statements are not mutually consistent with each other select \
         whichever statement is more recent. Repeat all the selected statements \
         verbatim. Do not summarize. Include timestamps. When in doubt, err on \
         the side of including more, especially for recent events. As long as \
         they are not inconsistent, recent events are usually important to \
         consider."
    );

    match now {
        Some(time) => format!(
            "The current date/time is: {}.\n{}",
            format_timestamp(time),
            instruction
        ),
        None => instruction,
    }
}

/// Instruction followed by the newline-joined candidate statements
pub fn filter_question(instruction: &str, candidates: &[String]) -> String {
    format!("{}\nStatements:\n{}", instruction, candidates.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 6, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_query_with_and_without_time() {
        assert_eq!(build_query("Bob", "he is tired", None), "Bob, he is tired");
        assert_eq!(
            build_query("Bob", "he is tired", Some(&noon())),
            "[2024-05-06 12:00:00] Bob, he is tired"
        );
    }

    #[test]
    fn test_instruction_demands_recency_and_verbatim() {
        let instruction = relevance_instruction("Bob", None);
        assert!(instruction.starts_with("Select the subset"));
        assert!(instruction.contains("important for Bob to consider right now"));
        assert!(instruction.contains("not mutually consistent"));
        assert!(instruction.contains("select whichever statement is more recent"));
        assert!(instruction.contains("Repeat all the selected statements verbatim"));
        assert!(instruction.contains("Do not summarize"));
        assert!(instruction.contains("Include timestamps"));
        assert!(!instruction.contains("date/time"));
    }

    #[test]
    fn test_instruction_time_prefix() {
        let instruction = relevance_instruction("Bob", Some(&noon()));
        assert!(instruction.starts_with("The current date/time is: 2024-05-06 12:00:00.\n"));
    }

    #[test]
    fn test_filter_question_with_no_candidates() {
        let question = filter_question("Pick.", &[]);
        assert_eq!(question, "Pick.\nStatements:\n");
    }
}
