//! Tiered flavor text for the dashboard cards.
//!
//! Each table is a sparse threshold map kept sorted descending; the
//! shared floor-lookup picks the message for the largest threshold at or
//! below the value, falling back to the smallest threshold when the
//! value sits below every key.

/// A main line plus its sarcastic sub-line.
#[derive(Debug, PartialEq, Eq)]
pub struct Commentary {
    pub main: &'static str,
    pub sub: &'static str,
}

pub type TierTable = &'static [(u64, Commentary)];

/// Losses are bucketed into currency-hundreds before lookup, capped at
/// this bucket. Anything past Rs 1000 earns the same top-tier scorn.
pub const LOSS_BUCKET_CAP: u64 = 10;

pub fn loss_bucket(lifetime_loss: u64) -> u64 {
    (lifetime_loss / 100).min(LOSS_BUCKET_CAP)
}

/// Floor-lookup over a descending-sorted tier table: the entry with the
/// largest threshold `<= value`, or the smallest-threshold entry when
/// the value is below all of them.
pub fn tier_message(table: TierTable, value: u64) -> Option<&'static Commentary> {
    table
        .iter()
        .find(|(threshold, _)| *threshold <= value)
        .or_else(|| table.last())
        .map(|(_, commentary)| commentary)
}

pub fn loss_commentary(lifetime_loss: u64) -> &'static Commentary {
    tier_message(LIFETIME_LOSS_TIERS, loss_bucket(lifetime_loss))
        .expect("loss tier table is populated")
}

pub fn streak_commentary(current_streak: u64) -> &'static Commentary {
    tier_message(STREAK_TIERS, current_streak).expect("streak tier table is populated")
}

pub fn solved_commentary(problems_solved: u64) -> &'static Commentary {
    tier_message(PROBLEMS_SOLVED_TIERS, problems_solved)
        .expect("problems-solved tier table is populated")
}

/// Keyed by loss bucket (currency-hundreds), 0 through the cap.
pub const LIFETIME_LOSS_TIERS: TierTable = &[
    (10, Commentary {
        main: "Rs 1000 gone. But hey, at least you're consistent.",
        sub: "Now imagine if that was invested in brain cells.",
    }),
    (9, Commentary {
        main: "You've almost reached influencer-level losses.",
        sub: "Just need a thread titled \"What I learned from failing...\"",
    }),
    (8, Commentary {
        main: "The market thanks you for your generous contribution.",
        sub: "Too bad it wasn't tax deductible.",
    }),
    (7, Commentary {
        main: "A fine way to burn money without fire.",
        sub: "Your portfolio called - it's crying.",
    }),
    (6, Commentary {
        main: "You really thought that stock was \"undervalued\", huh?",
        sub: "Turns out your instincts are, too.",
    }),
    (5, Commentary {
        main: "Congrats, you've unlocked premium regret.",
        sub: "No refunds. Only existential dread.",
    }),
    (4, Commentary {
        main: "Almost half a grand down the drain!",
        sub: "Consider it a donation to market chaos.",
    }),
    (3, Commentary {
        main: "At this rate, your losses are compounding better than your returns.",
        sub: "Financial freedom, but in reverse.",
    }),
    (2, Commentary {
        main: "You just paid for a lesson in humility.",
        sub: "Spoiler: The stock market doesn't care.",
    }),
    (1, Commentary {
        main: "Rs 100? Bold move, Warren Buffet.",
        sub: "Hope that taught you how not to invest.",
    }),
    (0, Commentary {
        main: "Congrats! You've risked absolutely nothing.",
        sub: "And that's exactly what you got in return.",
    }),
];

/// Keyed by raw streak length.
pub const STREAK_TIERS: TierTable = &[
    (100, Commentary {
        main: "100-day streak. Okay, chill, overachiever.",
        sub: "Blink twice if AI wrote the code.",
    }),
    (50, Commentary {
        main: "50 days in. Are you even human?",
        sub: "Or are you training for coding Olympics?",
    }),
    (30, Commentary {
        main: "A month straight. Please teach a masterclass.",
        sub: "You've officially outworked 97% of side projects.",
    }),
    (20, Commentary {
        main: "You're basically a monk now.",
        sub: "Inner peace achieved. Bugs feared.",
    }),
    (15, Commentary {
        main: "Fifteen days - enough to call it a lifestyle.",
        sub: "Careful, consistency might become a habit.",
    }),
    (10, Commentary {
        main: "Double digits? Who are you and what have you done with the old you?",
        sub: "Please don't ruin this with a weekend.",
    }),
    (9, Commentary {
        main: "At this point, it's just showing off.",
        sub: "Go ahead, solve world hunger while you're at it.",
    }),
    (8, Commentary {
        main: "This is no longer an accident.",
        sub: "You're making the rest of us look bad.",
    }),
    (7, Commentary {
        main: "A full week of productivity!",
        sub: "Doctors recommend rest, not miracles.",
    }),
    (6, Commentary {
        main: "You've outlasted most new year resolutions.",
        sub: "Keep going before reality kicks in.",
    }),
    (5, Commentary {
        main: "Five-day streak - statistically impressive.",
        sub: "Even your fridge light is proud.",
    }),
    (4, Commentary {
        main: "Who is this consistent beast?",
        sub: "At this point, your keyboard has feelings.",
    }),
    (3, Commentary {
        main: "Three whole days? Are you okay?",
        sub: "Blink twice if you need rest.",
    }),
    (2, Commentary {
        main: "Ok wow, a sequel?",
        sub: "Most trilogies don't make it this far.",
    }),
    (1, Commentary {
        main: "Wow, you showed up once.",
        sub: "Let's not pull a muscle celebrating.",
    }),
];

/// Keyed by raw solved-problem count.
pub const PROBLEMS_SOLVED_TIERS: TierTable = &[
    (100, Commentary {
        main: "Okay LeetCode legend, calm down.",
        sub: "Just don't start mentoring people yet.",
    }),
    (90, Commentary {
        main: "You've unlocked \"Algorithm PTSD.\"",
        sub: "Next boss: Dynamic Programming.",
    }),
    (80, Commentary {
        main: "This is either genius or self-punishment.",
        sub: "But it's working. Somehow.",
    }),
    (70, Commentary {
        main: "Your keyboard is legally a weapon.",
        sub: "Time to start naming your functions like kids.",
    }),
    (60, Commentary {
        main: "You now dream in code.",
        sub: "Syntax errors included.",
    }),
    (50, Commentary {
        main: "That's a milestone and a cry for help.",
        sub: "But hey, your imposter syndrome is shaking.",
    }),
    (45, Commentary {
        main: "You're deep in the algorithm abyss now.",
        sub: "Don't worry, recursion will find you.",
    }),
    (40, Commentary {
        main: "Somewhere, an interviewer smiled.",
        sub: "...Then added a twist to the problem.",
    }),
    (35, Commentary {
        main: "You're a machine.",
        sub: "Probably held together with caffeine and trauma.",
    }),
    (30, Commentary {
        main: "You might actually be getting good at this.",
        sub: "Too late to pretend it was a phase.",
    }),
    (25, Commentary {
        main: "Halfway to a LinkedIn flex.",
        sub: "Your code is starting to fear you.",
    }),
    (20, Commentary {
        main: "You've unlocked mild suffering.",
        sub: "Arrays. Strings. Tears.",
    }),
    (15, Commentary {
        main: "You've passed tutorial, entered grind mode.",
        sub: "You now speak fluent pseudocode.",
    }),
    (10, Commentary {
        main: "You're practically solving world hunger.",
        sub: "If world hunger was an array problem.",
    }),
    (9, Commentary {
        main: "Now you're just showing off.",
        sub: "Next stop: burnout or brilliance.",
    }),
    (8, Commentary {
        main: "Too late to quit, too early to brag.",
        sub: "Perfect spot for a crisis.",
    }),
    (7, Commentary {
        main: "That's like, a week of effort.",
        sub: "Or one really chaotic Sunday night.",
    }),
    (6, Commentary {
        main: "Somewhere, your CS professor just smiled.",
        sub: "And then immediately braced for disappointment.",
    }),
    (5, Commentary {
        main: "Welcome to the league of temporary motivation.",
        sub: "Your debugger is now mildly terrified.",
    }),
    (4, Commentary {
        main: "Just enough to be dangerously confident.",
        sub: "Stack Overflow still watching you struggle.",
    }),
    (3, Commentary {
        main: "You're officially in tutorial mode.",
        sub: "Still waiting for that \"Aha!\" moment.",
    }),
    (2, Commentary {
        main: "Calm down, prodigy.",
        sub: "Let's not burn out too fast.",
    }),
    (1, Commentary {
        main: "You're basically a software engineer now.",
        sub: "Resume updated. Job offers pending.",
    }),
];
