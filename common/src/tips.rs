//! 分別方法のヒント

use crate::types::Category;

pub fn tip_for(category: Category) -> &'static str {
    match category {
        Category::Recyclable => {
            "Clean the item and place it in the recycling bin. Remove any non-recyclable parts like caps or labels if possible."
        }
        Category::Biodegradable => {
            "Compost this item in your garden compost bin or municipal composting facility. It will break down naturally and enrich the soil."
        }
        Category::Hazardous => {
            "Take this item to a specialized hazardous waste collection center. Do not put it in regular trash as it can harm the environment."
        }
    }
}
