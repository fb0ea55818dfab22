use crate::{Card, ALL_COLLECTION};
use chrono::Utc;

const SAMPLES: [(&str, &str, &str, &[&str]); 11] = [
    (
        "Modern Interior Design Trends 2024",
        "Explore the latest trends in interior design focusing on sustainable materials and biophilic elements.",
        "https://images.unsplash.com/photo-1618221195710-dd6b41faaea6?w=800&q=80",
        &["Interior", "Design", "Home"],
    ),
    (
        "The Future of AI in Web Development",
        "How artificial intelligence is reshaping the landscape of frontend development and what it means for engineers.",
        "https://images.unsplash.com/photo-1677442136019-21780ecad995?w=800&q=80",
        &["Tech", "AI", "Code"],
    ),
    (
        "Minimalist Architecture",
        "A look into the clean lines and functional spaces of modern minimalist homes.",
        "https://images.unsplash.com/photo-1486325212027-8081e485255e?w=800&q=80",
        &["Arch", "Minimalism"],
    ),
    (
        "Healthy Meal Prep Ideas",
        "Save time and eat healthier with these 5 easy meal prep recipes for the week.",
        "https://images.unsplash.com/photo-1490645935967-10de6ba17061?w=800&q=80",
        &["Food", "Health"],
    ),
    (
        "Typography Inspiration",
        "Collection of beautiful serif and sans-serif font pairings for your next project.",
        "https://images.unsplash.com/photo-1561070791-2526d30994b5?w=800&q=80",
        &["Design", "Type"],
    ),
    (
        "Sustainable Fashion Guide",
        "Why eco-friendly fabrics are taking over the fashion industry.",
        "https://images.unsplash.com/photo-1483985988355-763728e1935b?w=800&q=80",
        &["Fashion", "Eco"],
    ),
    (
        "React Performance Optimization",
        "Tips and tricks to make your React applications faster and smoother.",
        "https://images.unsplash.com/photo-1633356122544-f134324a6cee?w=800&q=80",
        &["Dev", "React"],
    ),
    (
        "Photography Composition Rules",
        "Rule of thirds, leading lines, and framing techniques to improve your shots.",
        "https://images.unsplash.com/photo-1516035069371-29a1b244cc32?w=800&q=80",
        &["Photo", "Art"],
    ),
    (
        "UX Case Study: Finance App",
        "A deep dive into the user experience design of a modern fintech mobile application.",
        "https://images.unsplash.com/photo-1551288049-bebda4e38f71?w=800&q=80",
        &["UX", "UI"],
    ),
    (
        "Creative Writing Prompts",
        "Beat writer's block with these 50 creative writing prompts.",
        "https://images.unsplash.com/photo-1455390582262-044cdead277a?w=800&q=80",
        &["Writing", "Creative"],
    ),
    (
        "Generative AI Tools",
        "A comprehensive guide to the best generative AI tools for text, image, and video creation in 2024.",
        "https://images.unsplash.com/photo-1675271591211-126ad94e495d?w=800&q=80",
        &["AI", "Tools", "Tech"],
    ),
];

const DEFAULT_COLLECTIONS: [&str; 9] = [
    "Design",
    "Development",
    "AI",
    "Marketing",
    "Productivity",
    "Inspiration",
    "Tutorials",
    "Tools",
    "Startup",
];

const SAMPLE_CARD_COUNT: usize = 20;

/// Cards shown on a fresh install so the grid is not empty. The samples
/// repeat once the list runs out.
pub(crate) fn sample_cards() -> Vec<Card> {
    let created_at = Utc::now();
    SAMPLES
        .iter()
        .cycle()
        .take(SAMPLE_CARD_COUNT)
        .enumerate()
        .map(|(i, (title, summary, image_url, tags))| Card {
            id: format!("card-{i}"),
            title: (*title).to_string(),
            summary: (*summary).to_string(),
            image_url: Some((*image_url).to_string()),
            content_image_url: None,
            visual_focal_point: None,
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
            is_favorite: false,
            is_secret: false,
            created_at,
        })
        .collect()
}

pub(crate) fn default_collections() -> Vec<String> {
    std::iter::once(ALL_COLLECTION)
        .chain(DEFAULT_COLLECTIONS)
        .map(ToString::to_string)
        .collect()
}
