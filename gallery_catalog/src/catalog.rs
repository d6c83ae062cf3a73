use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, ensure};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::record::{PaintingRecord, SaleListing};

/// Number of `|`-separated fields in one catalog line.
const FIELD_COUNT: usize = 14;

/// Ordered painting collection. Indices are stable for the session: the
/// geometry registry sizes its angular slots from `len()` and the focus
/// detector reports indices into this ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    records: Vec<PaintingRecord>,
}

impl Catalog {
    /// Parse a pipe-delimited catalog. One record per line; blank lines and
    /// `#` comments are skipped. Field order:
    ///
    /// `id|image|title|artist|year|description|price|for_sale|auction|`
    /// `auction_ends|available|owner|authenticated_by|comments`
    ///
    /// `authenticated_by` holds zero or more `;`-separated names.
    pub fn parse(text: &str) -> Result<Self> {
        let mut records = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let record = parse_record(line)
                .with_context(|| format!("catalog line {}", line_no + 1))?;
            records.push(record);
        }
        ensure!(!records.is_empty(), "catalog contains no records");
        Ok(Catalog { records })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading catalog {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing catalog {}", path.display()))
    }

    /// Load `path`, or fall back to the built-in dataset when the path is
    /// absent, unreadable, or malformed. The fallback has the same shape
    /// guarantees as any parsed catalog (non-empty, stable indices).
    pub fn load_or_fallback(path: Option<&Path>) -> Self {
        match path {
            Some(path) => match Self::load(path) {
                Ok(catalog) => catalog,
                Err(err) => {
                    warn!(
                        "catalog {} unusable ({err:#}); using built-in dataset",
                        path.display()
                    );
                    Self::fallback()
                }
            },
            None => Self::fallback(),
        }
    }

    /// The deterministic built-in dataset: seven canonical paintings.
    pub fn fallback() -> Self {
        Catalog {
            records: fallback_records(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PaintingRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&PaintingRecord> {
        self.records.get(index)
    }
}

fn parse_record(line: &str) -> Result<PaintingRecord> {
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();
    ensure!(
        fields.len() == FIELD_COUNT,
        "expected {FIELD_COUNT} fields, found {}",
        fields.len()
    );

    let required = |idx: usize, name: &str| -> Result<String> {
        let value = fields[idx];
        ensure!(!value.is_empty(), "field {name} is empty");
        Ok(value.to_string())
    };
    let optional = |idx: usize| -> Option<String> {
        let value = fields[idx];
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    };

    let year = match fields[4] {
        "" => None,
        text => Some(
            text.parse::<i32>()
                .with_context(|| format!("year {text:?}"))?,
        ),
    };
    let price = fields[6]
        .parse::<u64>()
        .with_context(|| format!("price {:?}", fields[6]))?;
    let authenticated_by = fields[12]
        .split(';')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    Ok(PaintingRecord {
        id: required(0, "id")?,
        image: required(1, "image")?,
        title: required(2, "title")?,
        artist: required(3, "artist")?,
        year,
        description: required(5, "description")?,
        sale: SaleListing {
            price,
            for_sale: parse_bool(fields[7]).context("for_sale")?,
            auction: parse_bool(fields[8]).context("auction")?,
            auction_ends: optional(9),
            available: parse_bool(fields[10]).context("available")?,
            current_owner: optional(11),
            authenticated_by,
            seller_comments: optional(13),
        },
    })
}

fn parse_bool(value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(anyhow!("expected true/false, found {other:?}")),
    }
}

fn fallback_records() -> Vec<PaintingRecord> {
    struct Seed {
        id: &'static str,
        image: &'static str,
        title: &'static str,
        artist: &'static str,
        year: i32,
        description: &'static str,
        price: u64,
        for_sale: bool,
        auction: bool,
        auction_ends: &'static str,
        available: bool,
        owner: &'static str,
        authenticated_by: &'static [&'static str],
        comments: &'static str,
    }

    const SEEDS: &[Seed] = &[
        Seed {
            id: "P001",
            image: "socrates.jpg",
            title: "The Death of Socrates",
            artist: "Jacques-Louis David",
            year: 1787,
            description: "Completed in 1787, this painting depicts the moment when the Athenian philosopher Socrates, sentenced to death, prepares to drink hemlock.",
            price: 4_500_000,
            for_sale: true,
            auction: false,
            auction_ends: "",
            available: true,
            owner: "Private Collection",
            authenticated_by: &["Louvre Museum", "Metropolitan Museum"],
            comments: "DEMO DATA! NOT REAL! Acquired from a prestigious European collection in 2005.",
        },
        Seed {
            id: "P002",
            image: "stars.jpg",
            title: "Starry Night",
            artist: "Vincent Van Gogh",
            year: 1889,
            description: "Painted in 1889, this iconic work depicts a night scene with a swirling sky and bright crescent moon.",
            price: 12_000_000,
            for_sale: true,
            auction: true,
            auction_ends: "2023-12-31",
            available: true,
            owner: "Anonymous Collector",
            authenticated_by: &["Museum of Modern Art", "Van Gogh Museum"],
            comments: "DEMO DATA! NOT REAL! One of Van Gogh's most recognized masterpieces with exceptional provenance.",
        },
        Seed {
            id: "P003",
            image: "wave.jpg",
            title: "The Great Wave off Kanagawa",
            artist: "Katsushika Hokusai",
            year: 1831,
            description: "Created around 1831, this woodblock print depicts a massive wave threatening boats off the coast of Japan with Mount Fuji in the background.",
            price: 8_750_000,
            for_sale: true,
            auction: false,
            auction_ends: "",
            available: true,
            owner: "Japanese Art Foundation",
            authenticated_by: &["Tokyo National Museum", "British Museum"],
            comments: "DEMO DATA! NOT REAL! Excellent condition for its age with vibrant original colors.",
        },
        Seed {
            id: "P004",
            image: "spring.jpg",
            title: "Effect of Spring Giverny",
            artist: "Claude Monet",
            year: 1890,
            description: "Painted in 1890, this impressionist work captures the beauty of spring in Giverny, France.",
            price: 7_200_000,
            for_sale: true,
            auction: true,
            auction_ends: "2023-11-15",
            available: true,
            owner: "European Art Trust",
            authenticated_by: &["Mus\u{e9}e d'Orsay", "Giverny Foundation"],
            comments: "DEMO DATA! NOT REAL! Features Monet's garden which inspired many of his most famous works.",
        },
        Seed {
            id: "P005",
            image: "mountain.jpg",
            title: "Mount Corcoran",
            artist: "Albert Bierstadt",
            year: 1876,
            description: "Completed in the 1870s, this landscape painting captures the grandeur of the Sierra Nevada mountains.",
            price: 5_800_000,
            for_sale: true,
            auction: false,
            auction_ends: "",
            available: true,
            owner: "Western American Art Collection",
            authenticated_by: &["National Gallery of Art", "Smithsonian American Art Museum"],
            comments: "DEMO DATA! NOT REAL! Stunning example of American landscape painting with perfect light quality.",
        },
        Seed {
            id: "P006",
            image: "sunday.jpg",
            title: "A Sunday on La Grande Jatte",
            artist: "George Seurat",
            year: 1886,
            description: "Finished in 1886, this pointillist masterpiece depicts people relaxing in a park on the banks of the Seine River.",
            price: 10_500_000,
            for_sale: true,
            auction: true,
            auction_ends: "2023-10-30",
            available: false,
            owner: "Private European Estate",
            authenticated_by: &["Art Institute of Chicago", "Mus\u{e9}e d'Orsay"],
            comments: "DEMO DATA! NOT REAL! Remarkable pointillist technique with millions of tiny colored dots forming the image.",
        },
        Seed {
            id: "P007",
            image: "monalisa.jpg",
            title: "Mona Lisa",
            artist: "Leonardo da Vinci",
            year: 1503,
            description: "Painted between 1503 and 1519, the Mona Lisa is famous for her enigmatic smile and is one of the most recognized paintings in the world.",
            price: 0,
            for_sale: false,
            auction: false,
            auction_ends: "",
            available: false,
            owner: "",
            authenticated_by: &[],
            comments: "",
        },
    ];

    SEEDS
        .iter()
        .map(|seed| PaintingRecord {
            id: seed.id.to_string(),
            image: seed.image.to_string(),
            title: seed.title.to_string(),
            artist: seed.artist.to_string(),
            year: Some(seed.year),
            description: seed.description.to_string(),
            sale: SaleListing {
                price: seed.price,
                for_sale: seed.for_sale,
                auction: seed.auction,
                auction_ends: if seed.auction_ends.is_empty() {
                    None
                } else {
                    Some(seed.auction_ends.to_string())
                },
                available: seed.available,
                current_owner: if seed.owner.is_empty() {
                    None
                } else {
                    Some(seed.owner.to_string())
                },
                authenticated_by: seed
                    .authenticated_by
                    .iter()
                    .map(|name| name.to_string())
                    .collect(),
                seller_comments: if seed.comments.is_empty() {
                    None
                } else {
                    Some(seed.comments.to_string())
                },
            },
        })
        .collect()
}
