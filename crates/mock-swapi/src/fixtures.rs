//! Static dataset served by the mock. Reference URLs are built against the
//! server's own base so every link in a response points back at the mock.

use serde_json::{json, Value};

pub struct Person {
    pub name: &'static str,
    pub height: &'static str,
    pub hair_color: &'static str,
    pub eye_color: &'static str,
    pub gender: &'static str,
    pub homeworld: u32,
    pub films: &'static [u32],
    pub starships: &'static [u32],
}

/// Indexed by id - 1.
pub const PEOPLE: &[Person] = &[
    Person { name: "Luke Skywalker", height: "172", hair_color: "blond", eye_color: "blue", gender: "male", homeworld: 1, films: &[1, 2, 3, 6], starships: &[12, 22] },
    Person { name: "C-3PO", height: "167", hair_color: "n/a", eye_color: "yellow", gender: "n/a", homeworld: 1, films: &[1, 2, 3, 4, 5, 6], starships: &[] },
    Person { name: "R2-D2", height: "96", hair_color: "n/a", eye_color: "red", gender: "n/a", homeworld: 8, films: &[1, 2, 3, 4, 5, 6], starships: &[] },
    Person { name: "Darth Vader", height: "202", hair_color: "none", eye_color: "yellow", gender: "male", homeworld: 1, films: &[1, 2, 3, 6], starships: &[13] },
    Person { name: "Leia Organa", height: "150", hair_color: "brown", eye_color: "brown", gender: "female", homeworld: 2, films: &[1, 2, 3, 6], starships: &[] },
    Person { name: "Owen Lars", height: "178", hair_color: "brown, grey", eye_color: "blue", gender: "male", homeworld: 1, films: &[1, 5, 6], starships: &[] },
    Person { name: "Beru Whitesun lars", height: "165", hair_color: "brown", eye_color: "blue", gender: "female", homeworld: 1, films: &[1, 5, 6], starships: &[] },
    Person { name: "R5-D4", height: "97", hair_color: "n/a", eye_color: "red", gender: "n/a", homeworld: 1, films: &[1], starships: &[] },
    Person { name: "Biggs Darklighter", height: "183", hair_color: "black", eye_color: "brown", gender: "male", homeworld: 1, films: &[1], starships: &[12] },
    Person { name: "Obi-Wan Kenobi", height: "182", hair_color: "auburn, white", eye_color: "blue-gray", gender: "male", homeworld: 20, films: &[1, 2, 3, 4, 5, 6], starships: &[48, 59, 64, 65, 74] },
    Person { name: "Anakin Skywalker", height: "188", hair_color: "blond", eye_color: "blue", gender: "male", homeworld: 1, films: &[4, 5, 6], starships: &[39, 59, 65] },
    Person { name: "Wilhuff Tarkin", height: "180", hair_color: "auburn, grey", eye_color: "blue", gender: "male", homeworld: 21, films: &[1, 6], starships: &[] },
];

pub const PLANETS: &[(u32, &str)] = &[
    (1, "Tatooine"),
    (2, "Alderaan"),
    (8, "Naboo"),
    (20, "Stewjon"),
    (21, "Eriadu"),
];

pub const FILMS: &[(u32, &str)] = &[
    (1, "A New Hope"),
    (2, "The Empire Strikes Back"),
    (3, "Return of the Jedi"),
    (4, "The Phantom Menace"),
    (5, "Attack of the Clones"),
    (6, "Revenge of the Sith"),
];

pub const STARSHIPS: &[(u32, &str)] = &[
    (12, "X-wing"),
    (13, "TIE Advanced x1"),
    (22, "Imperial shuttle"),
    (39, "Naboo fighter"),
    (48, "Jedi starfighter"),
    (59, "Trade Federation cruiser"),
    (64, "Naboo star skiff"),
    (65, "Jedi Interceptor"),
    (74, "Belbullab-22 starfighter"),
];

pub fn person_json(base: &str, id: u32, p: &Person) -> Value {
    json!({
        "name": p.name,
        "height": p.height,
        "hair_color": p.hair_color,
        "eye_color": p.eye_color,
        "gender": p.gender,
        "homeworld": format!("{base}planets/{}/", p.homeworld),
        "films": p.films.iter().map(|f| format!("{base}films/{f}/")).collect::<Vec<_>>(),
        "starships": p.starships.iter().map(|s| format!("{base}starships/{s}/")).collect::<Vec<_>>(),
        "url": format!("{base}people/{id}/"),
    })
}

pub fn lookup(table: &[(u32, &'static str)], id: u32) -> Option<&'static str> {
    table.iter().find(|(i, _)| *i == id).map(|(_, n)| *n)
}
