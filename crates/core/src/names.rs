use crate::SetupRng;

const ANIMALS: &[&str] = &[
    "Mouse", "Fox", "Cat", "Dog", "Wolf", "Tiger", "Lion", "Bear", "Monkey", "Elephant", "Rabbit",
    "Panda", "Koala", "Owl", "Eagle", "Dolphin", "Turtle", "Penguin", "Kangaroo", "Giraffe",
];

const ADJECTIVES: &[&str] = &[
    "Jumpy", "Chatty", "Sleepy", "Playful", "Grumpy", "Cheerful", "Speedy", "Crafty", "Brave",
    "Shy", "Curious", "Cheeky", "Lazy", "Restless", "Wise", "Elegant", "Absent", "Hungry",
    "Dreamy", "Daring",
];

/// Placeholder name offered for empty setup slots, e.g. "Sleepy Fox".
pub fn random_name(rng: &mut SetupRng) -> String {
    let adjective = rng.choose(ADJECTIVES).copied().unwrap_or("Lucky");
    let animal = rng.choose(ANIMALS).copied().unwrap_or("Player");
    format!("{adjective} {animal}")
}
