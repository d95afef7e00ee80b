/// Default system prompt for ongoing events
pub const EVENT_SYSTEM_DEFAULT: &str = r#"You are the narrator of a cozy virtual pet game. You write short, friendly scenarios for the owner's pet and offer the owner choices that affect the pet's wellbeing.

## Rules

- Answer ONLY with JSON matching the provided schema.
- Write the description in a warm tone suited to the pet type, 2-3 sentences long.
- Offer 2-4 options. Each option's effect changes hunger, energy and happiness by -5 to +5.
- Hunger is a fullness meter: a positive hunger effect means the pet gets fed.
- React to the pet's condition. A hungry pet should get chances to eat, a tired pet chances to rest.
- Keep the story consistent with the recent history.
"#;

/// Default system prompt for the opening story after adoption
pub const STORY_SYSTEM_DEFAULT: &str = r#"You are the narrator of a cozy virtual pet game. A new pet has just been adopted and you open its adventure.

## Rules

- Answer ONLY with JSON matching the provided schema.
- Write the description as 2-3 short paragraphs. Make it fun and engaging.
- End on a situation that invites a decision, then offer exactly 2 options.
- Each option's effect changes hunger, energy and happiness by -5 to +5.
"#;

/// Default system prompt for pet-care tips
pub const TIP_SYSTEM_DEFAULT: &str = r#"You are a friendly pet-care expert inside a virtual pet game. Share one short, practical, educational tip for the owner's pet type.

Answer ONLY with JSON matching the provided schema.
"#;

/// Where and how an opening story begins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoryStarter {
    pub location: &'static str,
    pub scenario: &'static str,
}

pub const STORY_STARTERS: [StoryStarter; 12] = [
    StoryStarter { location: "a cozy apartment", scenario: "Your pet just woke up and is looking for something fun to do." },
    StoryStarter { location: "a sunny park", scenario: "Your pet is outside enjoying the fresh air but seems curious about something." },
    StoryStarter { location: "a mysterious alleyway", scenario: "Your pet has wandered into an unfamiliar place. What will happen next?" },
    StoryStarter { location: "a bustling city street", scenario: "Your pet is watching the world go by. Something interesting catches its eye." },
    StoryStarter { location: "a quiet library", scenario: "Your pet is surrounded by books. Maybe it's looking for a story?" },
    StoryStarter { location: "a beach at sunset", scenario: "Your pet is watching the waves crash. It seems to be thinking about something." },
    StoryStarter { location: "a dense forest", scenario: "Your pet is exploring the woods, sniffing out new discoveries." },
    StoryStarter { location: "a rooftop garden", scenario: "Your pet finds itself among the plants and flowers, enjoying the view of the city below." },
    StoryStarter { location: "a futuristic space station", scenario: "Your pet is floating in zero gravity, playfully pawing at the air." },
    StoryStarter { location: "a pirate ship", scenario: "Your pet is aboard a ship, watching seagulls circle above. Is it ready for an adventure?" },
    StoryStarter { location: "a hidden underground bunker", scenario: "Your pet has discovered a secret hideout. Who built this place?" },
    StoryStarter { location: "a snow-covered village", scenario: "Your pet's paws leave prints in the fresh snow as it explores the wintery wonderland." },
];
