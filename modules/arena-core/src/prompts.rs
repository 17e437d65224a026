//! Instruction prompts sent to the text generator.

use crate::battle::Contender;
use crate::quality::{EXCEPTIONAL_THRESHOLD, HIGH_THRESHOLD, MEDIUM_THRESHOLD};
use crate::score::{PERSONA_RUBRIC, PROMPT_RUBRIC};

pub const EVALUATION_SYSTEM: &str = "You are a strict, consistent evaluator of creative prompts. \
    You respond with a single JSON object and nothing else.";

pub const JUDGE_SYSTEM: &str = "You are an impartial debate judge. \
    You respond with a single JSON object and nothing else.";

/// Rubric instruction embedding the user's persona prompt.
pub fn evaluation_prompt(user_prompt: &str) -> String {
    let [specificity, creativity, coherence, complexity] = PROMPT_RUBRIC.fields;
    format!(
        r#"Evaluate the following prompt that a user wrote to create an AI persona.

PROMPT:
"""
{user_prompt}
"""

Score it on four criteria, each an integer from {s_min} to {s_max}:
- {specificity}: how concrete and detailed the persona description is
- {creativity}: how original and imaginative the concept is
- {coherence}: how internally consistent and well-structured it is
- {complexity}: how much depth, nuance, and layering it has (max {x_max})

"total" is the sum of the four scores ({t_min}-{t_max}).
For reference: {exceptional}+ is exceptional, {high}+ is high, {medium}+ is medium, below is low.

Respond with ONLY this JSON, no markdown:
{{"{specificity}": <int>, "{creativity}": <int>, "{coherence}": <int>, "{complexity}": <int>, "total": <int>, "reasoning": "<one or two sentences>"}}"#,
        specificity = specificity.field,
        creativity = creativity.field,
        coherence = coherence.field,
        complexity = complexity.field,
        s_min = specificity.min,
        s_max = specificity.max,
        x_max = complexity.max,
        t_min = PROMPT_RUBRIC.total.min,
        t_max = PROMPT_RUBRIC.total.max,
        exceptional = EXCEPTIONAL_THRESHOLD,
        high = HIGH_THRESHOLD,
        medium = MEDIUM_THRESHOLD,
    )
}

/// Judge instruction embedding both arguments, their traits, and rubric weights.
pub fn judge_prompt(topic: &str, persona1: &Contender, persona2: &Contender) -> String {
    let [logic, creativity, persuasiveness, relevance] = PERSONA_RUBRIC.fields;
    format!(
        r#"Two AI personas debated the topic below. Judge which argument is stronger.

TOPIC: {topic}

PERSONA 1 ({name1}) - intelligence {i1}, creativity {c1}, persuasion {p1}
ARGUMENT:
"""
{arg1}
"""

PERSONA 2 ({name2}) - intelligence {i2}, creativity {c2}, persuasion {p2}
ARGUMENT:
"""
{arg2}
"""

Score each persona on:
- {logic_f} (0-{logic_max}): soundness of reasoning and evidence
- {creat_f} (0-{creat_max}): originality of the angle taken
- {pers_f} (0-{pers_max}): how convincing the argument is
- {rel_f} (0-{rel_max}): how directly it addresses the topic
"total" is the sum of the four scores (0-100).

The winner must have the higher total. If the totals are within 3 points of each
other, the persona with the higher {pers_f} score wins.
"reasoning" must explain the decision in at least two sentences.

Respond with ONLY this JSON, no markdown:
{{"winner": "persona1" | "persona2",
 "scores": {{"persona1": {{"{logic_f}": <int>, "{creat_f}": <int>, "{pers_f}": <int>, "{rel_f}": <int>, "total": <int>}},
            "persona2": {{"{logic_f}": <int>, "{creat_f}": <int>, "{pers_f}": <int>, "{rel_f}": <int>, "total": <int>}}}},
 "reasoning": "<why the winner won>",
 "highlights": {{"persona1_best": "<strongest point of persona 1>", "persona2_best": "<strongest point of persona 2>"}},
 "improvement_suggestions": {{"persona1": "<advice>", "persona2": "<advice>"}}}}"#,
        name1 = persona1.name,
        i1 = persona1.traits.intelligence,
        c1 = persona1.traits.creativity,
        p1 = persona1.traits.persuasion,
        arg1 = persona1.argument,
        name2 = persona2.name,
        i2 = persona2.traits.intelligence,
        c2 = persona2.traits.creativity,
        p2 = persona2.traits.persuasion,
        arg2 = persona2.argument,
        logic_f = logic.field,
        logic_max = logic.max,
        creat_f = creativity.field,
        creat_max = creativity.max,
        pers_f = persuasiveness.field,
        pers_max = persuasiveness.max,
        rel_f = relevance.field,
        rel_max = relevance.max,
    )
}

/// Free-text request for a single debate topic.
pub fn topic_prompt(theme: Option<&str>) -> String {
    let theme_line = match theme {
        Some(theme) if !theme.trim().is_empty() => {
            format!(" The topic should relate to: {}.", theme.trim())
        }
        _ => String::new(),
    };
    format!(
        "Suggest one short, thought-provoking debate topic that two AI personas could argue \
         for and against.{theme_line} Reply with the topic only, as a single sentence."
    )
}
