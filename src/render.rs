use crate::filters::{KindFilter, PRICE_CEILING};
use crate::map::MapState;
use crate::models::{group_thousands, ListingType, Property};
use crate::page::{Page, ViewMode};
use std::fmt;

const TITLE: &str = "Find Your Perfect Property";
const RULE: &str = "------------------------------------------------------------";

/// Full page, top to bottom: header, filters, toolbar, listings or map,
/// then the open detail view.
pub fn render_page(page: &Page) -> String {
    PageView(page).to_string()
}

/// One listing card
pub fn render_card(property: &Property, page: &Page) -> String {
    CardView { property, page }.to_string()
}

/// Expanded detail view of one listing
pub fn render_details(property: &Property) -> String {
    DetailsView(property).to_string()
}

struct PageView<'a>(&'a Page);

impl fmt::Display for PageView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let page = self.0;
        if page.capabilities().show_header {
            write_header(f, page)?;
        }
        writeln!(f, "{TITLE}")?;
        writeln!(f, "{RULE}")?;
        write_filters(f, page)?;
        write_toolbar(f, page)?;

        match page.view_mode() {
            ViewMode::List => write_cards(f, page)?,
            ViewMode::Map => write_map(f, page)?,
        }

        if let Some(property) = page.selected() {
            writeln!(f, "{RULE}")?;
            write!(f, "{}", DetailsView(property))?;
        }
        Ok(())
    }
}

fn write_header(f: &mut fmt::Formatter<'_>, page: &Page) -> fmt::Result {
    let updated = page
        .fetched_at()
        .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "loading".to_string());

    write!(f, "[Guest ▾]")?;
    if page.capabilities().enable_favorites {
        let ids = page.favorites().iter().map(|id| format!("#{id}")).collect::<Vec<_>>();
        write!(f, "  ♥ {} [{}]", page.favorites().len(), ids.join(" "))?;
    }
    writeln!(f, "  updated: {updated}")
}

fn write_filters(f: &mut fmt::Formatter<'_>, page: &Page) -> fmt::Result {
    let filters = page.filters();
    let kinds = [KindFilter::All, KindFilter::Rent, KindFilter::Buy]
        .iter()
        .map(|k| {
            let mark = if *k == filters.kind { "(•)" } else { "( )" };
            format!("{mark} {}", k.label())
        })
        .collect::<Vec<_>>()
        .join("  ");
    let location = match filters.location.trim() {
        "" => "any",
        text => text,
    };
    let max = if filters.price.is_unbounded_above() {
        format!("${}+", group_thousands(PRICE_CEILING))
    } else {
        format!("${}", group_thousands(filters.price.max()))
    };
    let property_type = filters.property_type.map_or("any", |t| t.label());

    writeln!(f, "Filters: {kinds}")?;
    writeln!(
        f,
        "  Location: {location} | Price: ${} - {max} | Type: {property_type}",
        group_thousands(filters.price.min())
    )
}

fn write_toolbar(f: &mut fmt::Formatter<'_>, page: &Page) -> fmt::Result {
    let (list, map) = match page.view_mode() {
        ViewMode::List => ("[List View]", " Map View "),
        ViewMode::Map => (" List View ", "[Map View]"),
    };
    writeln!(f, "{list}{map}    Sort: {}", page.sort_key().label())?;
    writeln!(f, "{RULE}")
}

fn write_cards(f: &mut fmt::Formatter<'_>, page: &Page) -> fmt::Result {
    let visible = page.visible();
    if visible.is_empty() {
        return writeln!(f, "No properties to show.");
    }
    for property in visible {
        write!(f, "{}", CardView { property, page })?;
    }
    Ok(())
}

fn write_map(f: &mut fmt::Formatter<'_>, page: &Page) -> fmt::Result {
    if page.map().state() == MapState::Initializing {
        return writeln!(f, "Map loading...");
    }
    match page.map().render() {
        Some(rendered) => writeln!(f, "Map ({} markers): {rendered}", page.map().marker_count()),
        None => writeln!(f, "Map not mounted."),
    }
}

struct CardView<'a> {
    property: &'a Property,
    page: &'a Page,
}

impl fmt::Display for CardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { property, page } = self;
        let favorite = match (page.capabilities().enable_favorites, page.is_favorite(property.id)) {
            (false, _) => "",
            (true, true) => "♥ ",
            (true, false) => "♡ ",
        };

        writeln!(f, "{favorite}#{} {}", property.id, property.title)?;
        writeln!(f, "   {}", property.address)?;
        writeln!(
            f,
            "   {}   {} bd  {} ba",
            property.display_price(),
            property.bedrooms,
            property.bathrooms
        )?;
        writeln!(f, "   ★ {} ({} reviews)", property.rating, property.reviews)
    }
}

struct DetailsView<'a>(&'a Property);

impl fmt::Display for DetailsView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let property = self.0;
        let suffix = match property.listing_type {
            ListingType::Rent => "/mo",
            ListingType::Buy => "",
        };

        writeln!(f, "{}", property.title)?;
        writeln!(f, "{}", property.address)?;
        writeln!(f, "  Price:       ${}{suffix}", group_thousands(property.price))?;
        writeln!(f, "  Type:        {}", property.listing_type)?;
        writeln!(f, "  Seller:      {}", property.company)?;
        writeln!(f, "  Rooms:       {} bd, {} ba", property.bedrooms, property.bathrooms)?;
        writeln!(f, "  Rating:      {} ({} reviews)", property.rating, property.reviews)?;
        if let Some(description) = property.description.as_deref().filter(|d| !d.is_empty()) {
            writeln!(f, "  About:       {description}")?;
        }
        writeln!(f, "  Location:    {}, {}", property.latitude, property.longitude)?;
        writeln!(f, "  Image:       {}", property.image)?;
        writeln!(f, "  Analysis:    Idealista: {}/10", property.idealista_score)?;
        writeln!(f, "               Habitaclia: {}/10", property.habitaclia_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::testing::RecordingBackend;
    use crate::page::tests::{listing, page};
    use crate::page::Capabilities;

    #[test]
    fn list_view_shows_cards_in_sort_order() {
        let mut page = page();
        let ticket = page.mount();
        let _ = page.commit(ticket, Ok(vec![listing(1, 500.0, 4.5), listing(2, 300.0, 4.9)]));

        let out = render_page(&page);
        let first = out.find("#2 Listing 2").unwrap();
        let second = out.find("#1 Listing 1").unwrap();
        assert!(first < second);
        assert!(out.contains("[Guest ▾]"));
        assert!(out.contains("Sort: Price: Low to High"));
    }

    #[test]
    fn favorite_marker_reflects_membership() {
        let mut page = page();
        let ticket = page.mount();
        let _ = page.commit(ticket, Ok(vec![listing(1, 500.0, 4.5)]));
        page.toggle_favorite(1);

        let property = page.records()[0].clone();
        assert!(render_card(&property, &page).starts_with("♥ #1"));
        page.toggle_favorite(1);
        assert!(render_card(&property, &page).starts_with("♡ #1"));
    }

    #[test]
    fn plain_variant_hides_header_and_favorites() {
        let (backend, _) = RecordingBackend::new(true);
        let mut page = Page::new(
            Capabilities {
                show_header: false,
                enable_favorites: false,
            },
            Box::new(backend),
        );
        let ticket = page.mount();
        let _ = page.commit(ticket, Ok(vec![listing(1, 500.0, 4.5)]));

        let out = render_page(&page);
        assert!(!out.contains("Guest"));
        assert!(out.contains("\n#1 Listing 1"));
    }

    #[test]
    fn header_lists_favorites_and_open_details_follow_page() {
        let mut page = page();
        let ticket = page.mount();
        let _ = page.commit(ticket, Ok(vec![listing(1, 500.0, 4.5), listing(2, 300.0, 4.9)]));
        page.toggle_favorite(2);
        page.toggle_favorite(1);
        page.select(2);

        let out = render_page(&page);
        assert!(out.starts_with("[Guest ▾]  ♥ 2 [#1 #2]  updated: "), "{out}");
        let details = render_details(&page.records()[1]);
        assert!(details.starts_with("Listing 2\n"));
        assert!(out.ends_with(&format!("{RULE}\n{details}")));
    }

    #[test]
    fn empty_collection_renders_placeholder() {
        let mut page = page();
        let _ticket = page.mount();
        assert!(render_page(&page).contains("No properties to show."));
    }

    #[test]
    fn details_include_scores_and_rent_suffix() {
        let property = Property {
            id: 5,
            title: "Loft".to_string(),
            listing_type: ListingType::Rent,
            price: 1_850.0,
            company: "Acme Homes".to_string(),
            idealista_score: 8.5,
            habitaclia_score: 7.0,
            ..Default::default()
        };

        let out = render_details(&property);
        assert!(out.contains("Price:       $1,850/mo"));
        assert!(out.contains("Seller:      Acme Homes"));
        assert!(out.contains("Idealista: 8.5/10"));
        assert!(out.contains("Habitaclia: 7/10"));
    }

    #[test]
    fn map_view_renders_surface() {
        let mut page = page();
        let ticket = page.mount();
        let _ = page.commit(ticket, Ok(vec![listing(1, 500.0, 4.5)]));
        page.set_view_mode(ViewMode::Map);

        assert!(render_page(&page).contains("Map (1 markers): map "));
    }
}
