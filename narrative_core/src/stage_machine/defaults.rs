//! Built-in goal sets and narrative profiles for every stage.

use journey_rules::{Stage, StageGoal};

/// How a stage should feel when narrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageProfile {
    pub tone: &'static str,
    pub focus: &'static str,
    pub themes: &'static [&'static str],
    /// What narration should accomplish during the stage.
    pub narrative_goal: &'static str,
}

pub fn stage_profile(stage: Stage) -> StageProfile {
    match stage {
        Stage::OrdinaryWorld => StageProfile {
            tone: "peaceful",
            focus: "world building",
            themes: &["daily life", "hidden potential", "hints of change"],
            narrative_goal: "Establish the peaceful normal life and hint at coming disruption",
        },
        Stage::CallToAdventure => StageProfile {
            tone: "mysterious",
            focus: "revelation",
            themes: &["mystery", "call to action"],
            narrative_goal: "Present a clear problem that threatens the ordinary world",
        },
        Stage::RefusalOfCall => StageProfile {
            tone: "uncertain",
            focus: "inner conflict",
            themes: &["fear", "doubt", "the cost of leaving"],
            narrative_goal: "Let the hero hesitate and show what is at stake",
        },
        Stage::MeetingMentor => StageProfile {
            tone: "hopeful",
            focus: "guidance",
            themes: &["wisdom", "preparation", "gifts"],
            narrative_goal: "Introduce wisdom and guidance while revealing the larger stakes",
        },
        Stage::CrossingThreshold => StageProfile {
            tone: "resolute",
            focus: "commitment",
            themes: &["departure", "the unknown", "no turning back"],
            narrative_goal: "Push the hero to make a commitment to the adventure",
        },
        Stage::TestsAlliesEnemies => StageProfile {
            tone: "adventurous",
            focus: "challenge",
            themes: &["trials", "friendship", "rivalry"],
            narrative_goal: "Test the hero and reveal who can be trusted",
        },
        Stage::ApproachOrdeal => StageProfile {
            tone: "tense",
            focus: "preparation",
            themes: &["foreboding", "planning", "gathering strength"],
            narrative_goal: "Build dread as the hero nears the heart of the threat",
        },
        Stage::Ordeal => StageProfile {
            tone: "desperate",
            focus: "confrontation",
            themes: &["sacrifice", "courage", "darkest hour"],
            narrative_goal: "Bring the hero face to face with the greatest danger",
        },
        Stage::Reward => StageProfile {
            tone: "triumphant",
            focus: "victory",
            themes: &["reward", "recognition", "relief"],
            narrative_goal: "Let the hero claim what the ordeal has earned",
        },
        Stage::RoadBack => StageProfile {
            tone: "urgent",
            focus: "consequences",
            themes: &["pursuit", "homecoming", "lingering danger"],
            narrative_goal: "Show the consequences of the ordeal following the hero home",
        },
        Stage::Resurrection => StageProfile {
            tone: "climactic",
            focus: "transformation",
            themes: &["rebirth", "final test", "purification"],
            narrative_goal: "Test the hero one last time and reveal who they have become",
        },
        Stage::ReturnWithElixir => StageProfile {
            tone: "reflective",
            focus: "resolution",
            themes: &["renewal", "sharing", "a changed world"],
            narrative_goal: "Return the hero home with something to share",
        },
    }
}

type GoalSpec = (&'static str, &'static [&'static str], &'static [&'static str], &'static [&'static str]);

fn goal_specs(stage: Stage) -> &'static [GoalSpec] {
    match stage {
        Stage::OrdinaryWorld => &[
            (
                "Discover the mysterious letter",
                &["read", "open", "examine"],
                &["investigate", "search", "look"],
                &["letter exists"],
            ),
            (
                "Seek guidance about the dark warning",
                &["seek", "ask", "visit", "consult"],
                &["explore", "wander"],
                &["dark warning"],
            ),
        ],
        Stage::CallToAdventure => &[
            (
                "Learn what the warning means",
                &["learn", "ask", "study", "question"],
                &["investigate", "research"],
                &["mentor guidance"],
            ),
            (
                "Answer the call",
                &["accept", "agree", "help"],
                &["consider", "think"],
                &["quest importance"],
            ),
        ],
        Stage::RefusalOfCall => &[
            (
                "Face your doubts",
                &["hesitate", "refuse", "doubt", "fear", "worry"],
                &["rest", "reflect"],
                &[],
            ),
            (
                "Find a reason to go on",
                &["decide", "resolve", "commit", "promise"],
                &["remember", "pray"],
                &[],
            ),
        ],
        Stage::MeetingMentor => &[
            (
                "Seek the mentor's wisdom",
                &["listen", "ask", "learn", "train"],
                &["visit", "study"],
                &["mentor guidance"],
            ),
            (
                "Receive a gift for the road",
                &["accept", "take", "receive"],
                &["thank"],
                &[],
            ),
        ],
        Stage::CrossingThreshold => &[(
            "Leave the familiar behind",
            &["leave", "depart", "cross", "enter"],
            &["pack", "prepare"],
            &[],
        )],
        Stage::TestsAlliesEnemies => &[
            (
                "Prove yourself in the wild",
                &["fight", "defend", "survive", "track"],
                &["scout", "train"],
                &[],
            ),
            (
                "Win an ally's trust",
                &["befriend", "trust", "help", "join"],
                &["talk", "share"],
                &[],
            ),
        ],
        Stage::ApproachOrdeal => &[(
            "Prepare for what lies ahead",
            &["plan", "prepare", "approach", "sneak"],
            &["scout", "gather"],
            &[],
        )],
        Stage::Ordeal => &[(
            "Confront the threat",
            &["confront", "fight", "face", "seal"],
            &["endure", "pray"],
            &[],
        )],
        Stage::Reward => &[(
            "Claim the reward",
            &["claim", "take", "seize", "receive"],
            &["search", "celebrate"],
            &[],
        )],
        Stage::RoadBack => &[(
            "Begin the journey home",
            &["return", "flee", "travel", "escape"],
            &["rest", "regroup"],
            &[],
        )],
        Stage::Resurrection => &[(
            "Pass the final test",
            &["sacrifice", "rise", "overcome", "purify"],
            &["remember", "choose"],
            &[],
        )],
        Stage::ReturnWithElixir => &[(
            "Share what you have won",
            &["share", "heal", "give", "teach"],
            &["celebrate", "rest"],
            &[],
        )],
    }
}

/// The built-in goal set for a stage, all incomplete.
pub fn default_goals(stage: Stage) -> Vec<StageGoal> {
    goal_specs(stage)
        .iter()
        .map(|(description, required, optional, knowledge)| {
            StageGoal::new(*description)
                .with_required_actions(required.iter().copied())
                .with_optional_actions(optional.iter().copied())
                .with_required_knowledge(knowledge.iter().copied())
        })
        .collect()
}
