//! Demo data command handler

use crate::config::Config;
use crate::db::{NewUser, Store};
use crate::domain::{BodyType, FuelType, Role, Transmission};
use crate::models::car::NewCar;
use crate::models::inquiry::NewInquiry;
use crate::models::preferences::Preferences;

const DEMO_CUSTOMER_EMAIL: &str = "john@example.com";
const DEMO_CUSTOMER_PASSWORD: &str = "customer123";

struct DemoCar {
    make: &'static str,
    model: &'static str,
    year: i32,
    price: i64,
    mileage: i64,
    color: &'static str,
    fuel_type: FuelType,
    body_type: BodyType,
    image: &'static str,
    description: &'static str,
    features: &'static [&'static str],
}

const DEMO_CARS: &[DemoCar] = &[
    DemoCar {
        make: "Toyota",
        model: "Camry",
        year: 2023,
        price: 28_500,
        mileage: 15_000,
        color: "Silver",
        fuel_type: FuelType::Gasoline,
        body_type: BodyType::Sedan,
        image: "/toyota-camry-silver.png",
        description: "Reliable and fuel-efficient sedan for daily commuting.",
        features: &["Backup Camera", "Bluetooth", "Cruise Control", "Keyless Entry"],
    },
    DemoCar {
        make: "Honda",
        model: "CR-V",
        year: 2022,
        price: 32_000,
        mileage: 25_000,
        color: "Blue",
        fuel_type: FuelType::Gasoline,
        body_type: BodyType::Suv,
        image: "/blue-honda-crv-suv.png",
        description: "Spacious SUV with excellent safety ratings and cargo space.",
        features: &["All-Wheel Drive", "Sunroof", "Heated Seats", "Apple CarPlay"],
    },
    DemoCar {
        make: "Tesla",
        model: "Model 3",
        year: 2023,
        price: 45_000,
        mileage: 8_000,
        color: "White",
        fuel_type: FuelType::Electric,
        body_type: BodyType::Sedan,
        image: "/tesla-model-3-white-electric.png",
        description: "Electric sedan with driver assistance and over-the-air updates.",
        features: &["Autopilot", "Supercharging", "Glass Roof", "Premium Audio"],
    },
    DemoCar {
        make: "Ford",
        model: "F-150",
        year: 2022,
        price: 38_000,
        mileage: 20_000,
        color: "Black",
        fuel_type: FuelType::Gasoline,
        body_type: BodyType::Truck,
        image: "/placeholder.svg?height=400&width=600",
        description: "Full-size truck with towing capacity for work and play.",
        features: &["4WD", "Towing Package", "Bed Liner", "Remote Start"],
    },
    DemoCar {
        make: "BMW",
        model: "3 Series",
        year: 2021,
        price: 35_000,
        mileage: 18_000,
        color: "Gray",
        fuel_type: FuelType::Gasoline,
        body_type: BodyType::Sedan,
        image: "/placeholder.svg?height=400&width=600",
        description: "Luxury sedan with sporty performance and premium features.",
        features: &["Leather Seats", "Navigation", "Sport Mode", "Parking Sensors"],
    },
    DemoCar {
        make: "Toyota",
        model: "Prius",
        year: 2024,
        price: 31_000,
        mileage: 2_500,
        color: "Red",
        fuel_type: FuelType::Hybrid,
        body_type: BodyType::Hatchback,
        image: "/placeholder.svg?height=400&width=600",
        description: "Efficient hybrid hatchback with a roomy cabin.",
        features: &["Bluetooth", "Lane Keeping Assist", "Adaptive Cruise Control"],
    },
];

impl DemoCar {
    fn to_new_car(&self) -> NewCar {
        NewCar {
            make: self.make.to_string(),
            model: self.model.to_string(),
            year: self.year,
            price: self.price,
            mileage: self.mileage,
            color: self.color.to_string(),
            fuel_type: self.fuel_type,
            transmission: Transmission::Automatic,
            body_type: self.body_type,
            images: vec![self.image.to_string()],
            description: self.description.to_string(),
            features: self.features.iter().map(|f| (*f).to_string()).collect(),
            is_available: true,
        }
    }
}

pub async fn cmd_seed(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    if store.count_cars(false).await? == 0 {
        let mut first_car_id = None;
        for car in DEMO_CARS {
            let stored = store.add_car(car.to_new_car()).await?;
            first_car_id.get_or_insert(stored.id);
        }
        println!("Added {} demo cars", DEMO_CARS.len());

        let customer = match store.get_user_by_email(DEMO_CUSTOMER_EMAIL).await? {
            Some(user) => user,
            None => {
                let user = store
                    .create_user(
                        NewUser {
                            email: DEMO_CUSTOMER_EMAIL.to_string(),
                            name: "John Smith".to_string(),
                            phone: Some("(555) 123-4567".to_string()),
                            password: Some(DEMO_CUSTOMER_PASSWORD.to_string()),
                            role: Role::Customer,
                        },
                        &config.security,
                    )
                    .await?;

                let preferences = Preferences {
                    max_price: Some(35_000),
                    preferred_makes: vec!["Toyota".to_string(), "Honda".to_string()],
                    preferred_fuel_types: vec!["GASOLINE".to_string(), "HYBRID".to_string()],
                    ..Preferences::default()
                };
                store.save_preferences(&user.id, &preferences).await?;
                println!("Demo customer: {DEMO_CUSTOMER_EMAIL} / {DEMO_CUSTOMER_PASSWORD}");
                user
            }
        };

        store
            .add_inquiry(NewInquiry {
                name: customer.name.clone(),
                email: customer.email.clone(),
                phone: customer.phone.clone(),
                message: "Interested in the Toyota Camry. Can we schedule a test drive?"
                    .to_string(),
                car_id: first_car_id,
                user_id: Some(customer.id),
            })
            .await?;
    } else {
        println!("Inventory is not empty; skipping demo data.");
    }

    Ok(())
}
