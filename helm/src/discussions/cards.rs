//! Static tarot deck used to turn card names from a discussion into images.

use serde::Serialize;

const MAJOR_ARCANA: [&str; 22] = [
    "The Fool",
    "The Magician",
    "The High Priestess",
    "The Empress",
    "The Emperor",
    "The Hierophant",
    "The Lovers",
    "The Chariot",
    "Strength",
    "The Hermit",
    "Wheel of Fortune",
    "Justice",
    "The Hanged Man",
    "Death",
    "Temperance",
    "The Devil",
    "The Tower",
    "The Star",
    "The Moon",
    "The Sun",
    "Judgement",
    "The World",
];

const SUITS: [(&str, char); 4] = [
    ("Cups", 'c'),
    ("Pentacles", 'p'),
    ("Swords", 's'),
    ("Wands", 'w'),
];

const RANKS: [&str; 14] = [
    "Ace", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Page",
    "Knight", "Queen", "King",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arcana {
    Major,
    Minor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub name: String,
    pub number: u8,
    pub arcana: Arcana,
    pub suit: Option<String>,
    pub img: String,
}

/// A card as rendered next to a discussion. `src` is empty when the name
/// is not in the deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardImage {
    pub name: String,
    pub src: String,
}

impl CardImage {
    pub fn is_missing(&self) -> bool {
        self.src.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct CardCatalog {
    cards: Vec<Card>,
    image_root: String,
}

impl CardCatalog {
    /// The 78-card deck with images under `cards/`.
    pub fn standard() -> Self {
        Self::with_image_root("cards")
    }

    pub fn with_image_root(image_root: impl Into<String>) -> Self {
        let mut cards = Vec::with_capacity(78);

        for (number, name) in MAJOR_ARCANA.iter().enumerate() {
            cards.push(Card {
                name: (*name).to_string(),
                number: number as u8,
                arcana: Arcana::Major,
                suit: None,
                img: format!("m{number:02}.jpg"),
            });
        }

        for (suit, prefix) in SUITS {
            for (i, rank) in RANKS.iter().enumerate() {
                let number = i as u8 + 1;
                cards.push(Card {
                    name: format!("{rank} of {suit}"),
                    number,
                    arcana: Arcana::Minor,
                    suit: Some(suit.to_string()),
                    img: format!("{prefix}{number:02}.jpg"),
                });
            }
        }

        Self {
            cards,
            image_root: image_root.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Case-insensitive name match; "Sun" and "The Sun" are the same card.
    /// A bare number selects a major arcana card.
    pub fn find(&self, name: &str) -> Option<&Card> {
        let wanted = normalize(name);
        if wanted.is_empty() {
            return None;
        }

        if let Ok(number) = wanted.parse::<u8>() {
            return self
                .cards
                .iter()
                .find(|c| c.arcana == Arcana::Major && c.number == number);
        }

        self.cards.iter().find(|c| normalize(&c.name) == wanted)
    }

    pub fn image(&self, name: &str) -> CardImage {
        let name = name.trim();
        let src = match self.find(name) {
            Some(card) => format!("{}/{}", self.image_root, card.img),
            None => {
                tracing::debug!(card = name, "Card not in catalog");
                String::new()
            }
        };
        CardImage {
            name: name.to_string(),
            src,
        }
    }

    /// Images for a list of names, in the given order.
    pub fn images<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Vec<CardImage> {
        names.into_iter().map(|name| self.image(name)).collect()
    }
}

impl Default for CardCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn normalize(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    match lower.strip_prefix("the ") {
        Some(rest) => rest.trim_start().to_string(),
        None => lower,
    }
}
