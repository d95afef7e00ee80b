use rand::seq::IndexedRandom;
use rand::Rng;

pub const CAT_NAMES: [&str; 30] = [
    "Whiskers", "Mittens", "Luna", "Oliver", "Leo", "Bella", "Charlie", "Lucy",
    "Max", "Lily", "Simba", "Cleo", "Felix", "Nala", "Oscar", "Milo", "Sophie",
    "Jack", "Kitty", "Tiger", "Shadow", "Smokey", "Misty", "Oreo", "Pepper",
    "Ginger", "Sasha", "Pumpkin", "Jasper", "Ruby",
];

pub const DOG_NAMES: [&str; 30] = [
    "Buddy", "Max", "Bailey", "Cooper", "Daisy", "Sadie", "Molly", "Lola",
    "Rocky", "Maggie", "Charlie", "Sophie", "Jack", "Stella", "Toby", "Lucy",
    "Duke", "Zoe", "Teddy", "Lily", "Bentley", "Mia", "Rusty", "Coco",
    "Murphy", "Gracie", "Bear", "Penny", "Tucker", "Rosie",
];

pub const RABBIT_NAMES: [&str; 30] = [
    "Thumper", "Hoppy", "Flopsy", "Mopsy", "Cottontail", "Bun-Bun", "Clover",
    "Daisy", "Oreo", "Cinnamon", "Snowball", "Pepper", "Nibbles", "Toffee",
    "Caramel", "Peanut", "Hazel", "Cocoa", "Marshmallow", "Nutmeg", "Ginger",
    "Honey", "Vanilla", "Mocha", "Licorice", "Butterscotch", "Cookie", "Maple",
    "Pumpkin", "Willow",
];

pub const BIRD_NAMES: [&str; 30] = [
    "Tweety", "Sunny", "Sky", "Blueberry", "Kiwi", "Mango", "Peaches", "Rio",
    "Skye", "Zephyr", "Feather", "Piper", "Sparky", "Chirpy", "Phoenix", "Polly",
    "Robin", "Finch", "Falcon", "Eagle", "Hawk", "Raven", "Dove", "Sparrow",
    "Jay", "Oriole", "Cardinal", "Hummingbird", "Parrot", "Cockatiel",
];

pub const FISH_NAMES: [&str; 30] = [
    "Bubbles", "Splash", "Nemo", "Dory", "Finn", "Goldie", "Coral", "Marlin",
    "Flounder", "Ariel", "Guppy", "Flipper", "Ripple", "Wave", "Pearl", "Shimmer",
    "Aqua", "Neptune", "Poseidon", "Marina", "Triton", "Oceana", "Tide", "Sailor",
    "Captain", "Shelly", "Scales", "Gill", "Finley", "Nessie",
];

pub const HAMSTER_NAMES: [&str; 30] = [
    "Peanut", "Nibbles", "Squeaky", "Hammy", "Biscuit", "Cookie", "Nugget", "Tiny",
    "Gizmo", "Cinnamon", "Honey", "Oreo", "Marshmallow", "Buttercup", "Snickers",
    "Chewy", "Popcorn", "Pumpkin", "Muffin", "Cupcake", "Waffle", "Pancake",
    "Scooter", "Whiskers", "Fuzzy", "Teddy", "Pepper", "Ginger", "Nutmeg", "Cocoa",
];

/// Name list for a pet type; unknown types get cat names
pub fn names_for(pet_type: &str) -> &'static [&'static str] {
    match pet_type.to_lowercase().as_str() {
        "dog" => &DOG_NAMES,
        "rabbit" => &RABBIT_NAMES,
        "bird" => &BIRD_NAMES,
        "fish" => &FISH_NAMES,
        "hamster" => &HAMSTER_NAMES,
        _ => &CAT_NAMES,
    }
}

/// Pick a random name suited to `pet_type`
pub fn suggest_name<R: Rng + ?Sized>(pet_type: &str, rng: &mut R) -> &'static str {
    names_for(pet_type).choose(rng).copied().unwrap_or("Buddy")
}
