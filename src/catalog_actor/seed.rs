//! The starting catalog: eight drinks across the two categories.

use crate::model::{Category, ProductCreate};

const IMAGE_BASE: &str = "https://images.unsplash.com";
const IMAGE_PARAMS: &str = "ixlib=rb-4.0.3&auto=format&fit=crop&w=400&h=300";

fn drink(
    name: &str,
    description: &str,
    price: u32,
    volume: &str,
    category: Category,
    photo: &str,
) -> ProductCreate {
    ProductCreate {
        name: name.to_string(),
        description: description.to_string(),
        price,
        volume: volume.to_string(),
        category,
        image: format!("{IMAGE_BASE}/{photo}?{IMAGE_PARAMS}"),
        in_stock: true,
    }
}

/// Seed products in id order; the first is assigned id 1.
pub fn seed_products() -> Vec<ProductCreate> {
    use Category::{Energy, Soft};
    vec![
        drink(
            "Paya Energy Boost",
            "Natural caffeine and vitamins for sustained energy",
            150,
            "500ml",
            Energy,
            "photo-1622483767028-3f66f32aef97",
        ),
        drink(
            "Paya Thunder",
            "Maximum power with electrolytes and B-vitamins",
            180,
            "330ml",
            Energy,
            "photo-1558618666-fcd25c85cd64",
        ),
        drink(
            "Paya Sport",
            "Perfect for workouts and sports activities",
            160,
            "500ml",
            Energy,
            "photo-1571068316344-75bc76f77890",
        ),
        drink(
            "Paya Cola Classic",
            "Traditional cola taste with natural ingredients",
            120,
            "500ml",
            Soft,
            "photo-1561758033-48d52648ae8b",
        ),
        drink(
            "Paya Orange Burst",
            "Zesty orange flavor with real fruit extracts",
            110,
            "330ml",
            Soft,
            "photo-1530062845289-9b8643bfebb9",
        ),
        drink(
            "Paya Lemon Lime",
            "Crisp and refreshing citrus blend",
            100,
            "330ml",
            Soft,
            "photo-1581636625402-29b2a704ef13",
        ),
        drink(
            "Paya Sparkling Water",
            "Pure sparkling water with natural minerals",
            80,
            "500ml",
            Soft,
            "photo-1556909114-58a8f33c4d1b",
        ),
        drink(
            "Paya Tropical Mix",
            "Exotic blend of mango and passion fruit",
            140,
            "500ml",
            Soft,
            "photo-1534353436294-0dbd4bdac845",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_has_three_energy_drinks_first() {
        let products = seed_products();
        assert_eq!(products.len(), 8);
        assert_eq!(products[0].name, "Paya Energy Boost");
        assert_eq!(products[0].price, 150);
        let energy = products.iter().filter(|p| p.category == Category::Energy).count();
        assert_eq!(energy, 3);
        assert!(products.iter().all(|p| p.price > 0 && p.in_stock));
    }
}
