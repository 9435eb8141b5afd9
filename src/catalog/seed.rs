//! Built-in shelf catalog used when no catalog file exists yet
//!
//! Coordinates are normalized against the reference bookshelf photo.

/// Shelf row of the upper books
const TOP: u8 = 0;
/// Shelf row of the lower books
const BOTTOM: u8 = 1;

pub(crate) struct SeedBook {
    pub key: &'static str,
    pub name: &'static str,
    pub shelf: u8,
    pub position: [f32; 4],
    pub points: Option<[[f32; 2]; 4]>,
}

pub(crate) const SEED_BOOKS: &[SeedBook] = &[
    SeedBook {
        key: "rethinking users",
        name: "Rethinking Users: The Design Guide to User Ecosystem Thinking",
        shelf: TOP,
        position: [0.1794, 0.3617, 0.2181, 0.2169],
        points: None,
    },
    SeedBook {
        key: "design justice",
        name: "DESIGN JUSTICE COMMUNITY-LED PRACTICES TO BUILD THE WORLDS WE NEED",
        shelf: TOP,
        position: [0.5020, 0.3672, 0.0297, 0.2245],
        points: None,
    },
    SeedBook {
        key: "do good design",
        name: "do good design HOW DESIGNERS CAN CHANGE THE WORLD",
        shelf: TOP,
        position: [0.4707, 0.3792, 0.0235, 0.1946],
        points: None,
    },
    SeedBook {
        key: "the social life of information",
        name: "THE SOCIAL LIFE OF INFORMATION",
        shelf: TOP,
        position: [0.4315, 0.3746, 0.0417, 0.2039],
        points: None,
    },
    SeedBook {
        key: "lean impact",
        name: "LEAN IMPACT",
        shelf: TOP,
        position: [0.3983, 0.3650, 0.0387, 0.2165],
        points: Some([[0.3829, 0.2582], [0.4177, 0.2567], [0.4048, 0.4725], [0.3790, 0.4732]]),
    },
    SeedBook {
        key: "convivial toolbox",
        name: "CONVIVIAL TOOLBOX",
        shelf: TOP,
        position: [0.5709, 0.3653, 0.0347, 0.2269],
        points: None,
    },
    SeedBook {
        key: "presentationzen",
        name: "presentationzen",
        shelf: TOP,
        position: [0.5933, 0.3657, 0.0238, 0.2314],
        points: Some([[0.5913, 0.2537], [0.6052, 0.2500], [0.5982, 0.4784], [0.5813, 0.4814]]),
    },
    SeedBook {
        key: "good by design",
        name: "GOOD BY DESIGN",
        shelf: TOP,
        position: [0.5367, 0.3642, 0.0337, 0.2292],
        points: Some([[0.5536, 0.2496], [0.5516, 0.4773], [0.5198, 0.4788], [0.5228, 0.2496]]),
    },
    SeedBook {
        key: "what's mine is yours",
        name: "WHAT'S MINE IS YOURS",
        shelf: TOP,
        position: [0.6796, 0.3642, 0.0456, 0.2173],
        points: None,
    },
    SeedBook {
        key: "life 3.0",
        name: "LIFE 3.0: BEING HUMAN IN THE AGE OF ARTIFICIAL INTELLIGENCE",
        shelf: TOP,
        position: [0.7078, 0.3653, 0.0466, 0.2165],
        points: None,
    },
    SeedBook {
        key: "iterate",
        name: "ITERATE",
        shelf: TOP,
        position: [0.7341, 0.3631, 0.0536, 0.2188],
        points: Some([[0.6845, 0.2571], [0.7063, 0.2571], [0.7312, 0.4736], [0.7083, 0.4728]]),
    },
    SeedBook {
        key: "rules of play",
        name: "Rules of Play: Game Design Fundamentals",
        shelf: TOP,
        position: [0.7728, 0.3642, 0.0655, 0.2195],
        points: Some([[0.7401, 0.2574], [0.7837, 0.2545], [0.8056, 0.4732], [0.7679, 0.4740]]),
    },
    SeedBook {
        key: "universal principles of design",
        name: "Universal Principles of Design",
        shelf: TOP,
        position: [0.8795, 0.3527, 0.0288, 0.2388],
        points: None,
    },
    SeedBook {
        key: "design by numbers",
        name: "Design By Numbers",
        shelf: TOP,
        position: [0.8562, 0.3574, 0.0256, 0.2332],
        points: None,
    },
    SeedBook {
        key: "coffee lids",
        name: "COFFEE LIDS",
        shelf: BOTTOM,
        position: [0.3110, 0.7917, 0.2093, 0.0670],
        points: Some([[0.2063, 0.7716], [0.2371, 0.8251], [0.4157, 0.8110], [0.3720, 0.7582]]),
    },
    SeedBook {
        key: "code as creative medium",
        name: "Code as Creative Medium",
        shelf: BOTTOM,
        position: [0.8517, 0.7303, 0.0625, 0.0513],
        points: None,
    },
    SeedBook {
        key: "graphic design rants and raves",
        name: "HELLER GRAPHIC DESIGN RANTS AND RAVES",
        shelf: BOTTOM,
        position: [0.5431, 0.7249, 0.0447, 0.2058],
        points: Some([[0.8264, 0.7046], [0.8829, 0.7046], [0.8631, 0.7552], [0.8204, 0.7560]]),
    },
    SeedBook {
        key: "teaching graphic design",
        name: "TEACHING GRAPHIC DESIGN",
        shelf: BOTTOM,
        position: [0.5665, 0.7251, 0.0476, 0.2039],
        points: None,
    },
    SeedBook {
        key: "thinking with type",
        name: "thinking with type A CRITICAL GUIDE",
        shelf: BOTTOM,
        position: [0.5134, 0.7335, 0.0407, 0.1961],
        points: None,
    },
    SeedBook {
        key: "brand bible",
        name: "BRAND BIBLE",
        shelf: BOTTOM,
        position: [0.5918, 0.7143, 0.0486, 0.2143],
        points: Some([[0.5179, 0.6354], [0.5337, 0.6373], [0.5099, 0.8296], [0.4930, 0.8315]]),
    },
    SeedBook {
        key: "branded interactions",
        name: "BRANDED INTERACTIONS",
        shelf: BOTTOM,
        position: [0.6245, 0.7013, 0.0685, 0.2374],
        points: Some([[0.6200, 0.5833], [0.6587, 0.5826], [0.6220, 0.8199], [0.5903, 0.8192]]),
    },
    SeedBook {
        key: "type & image",
        name: "TYPE & IMAGE",
        shelf: BOTTOM,
        position: [0.6548, 0.6953, 0.0595, 0.2500],
        points: Some([[0.6637, 0.5703], [0.6845, 0.5703], [0.6448, 0.8188], [0.6250, 0.8203]]),
    },
    SeedBook {
        key: "typography 34",
        name: "TYPOGRAPHY 34",
        shelf: BOTTOM,
        position: [0.6835, 0.6908, 0.0694, 0.2582],
        points: None,
    },
    SeedBook {
        key: "guerrilla advertising",
        name: "GUERRILLA ADVERTISING",
        shelf: BOTTOM,
        position: [0.7168, 0.6866, 0.0724, 0.2682],
        points: Some([[0.6895, 0.5625], [0.7182, 0.5617], [0.6746, 0.8170], [0.6488, 0.8199]]),
    },
];
