use crate::models::StationCode;

// ICAO code -> airport name, for page headings only
const AIRPORTS: &[(&str, &str)] = &[
    // French Antilles and neighbours
    ("TFFF", "Martinique Aimé Césaire International Airport"),
    ("TFFR", "Guadeloupe Pôle Caraïbes Airport"),
    ("TFFJ", "Saint-Barthélemy Rémy de Haenen Airport"),
    ("TFFG", "Saint-Martin Grand Case Airport"),
    ("TFFM", "Marie-Galante Airport"),
    ("TLPL", "Hewanorra International Airport (Saint Lucia)"),
    ("TLPC", "George F. L. Charles Airport (Saint Lucia)"),
    ("TDPD", "Douglas-Charles Airport (Dominica)"),
    ("TBPB", "Grantley Adams International Airport (Barbados)"),
    ("TTPP", "Piarco International Airport (Trinidad)"),
    ("TNCM", "Princess Juliana International Airport (Sint Maarten)"),
    ("TJSJ", "Luis Muñoz Marín International Airport (Puerto Rico)"),
    ("SOCA", "Cayenne Félix Eboué Airport (French Guiana)"),
    // metropolitan France
    ("LFPG", "Paris Charles de Gaulle Airport"),
    ("LFPO", "Paris Orly Airport"),
    ("LFML", "Marseille Provence Airport"),
    ("LFLL", "Lyon Saint-Exupéry Airport"),
    ("LFBO", "Toulouse-Blagnac Airport"),
    ("LFMN", "Nice Côte d'Azur Airport"),
    // elsewhere
    ("EGLL", "London Heathrow Airport"),
    ("EDDF", "Frankfurt Airport"),
    ("LEMD", "Adolfo Suárez Madrid-Barajas Airport"),
    ("KJFK", "John F. Kennedy International Airport"),
    ("KMIA", "Miami International Airport"),
    ("KATL", "Hartsfield-Jackson Atlanta International Airport"),
    ("KLAX", "Los Angeles International Airport"),
    ("CYUL", "Montréal-Trudeau International Airport"),
    ("CYYZ", "Toronto Pearson International Airport"),
    ("YSSY", "Sydney Kingsford Smith Airport"),
];

pub fn airport_name(station: &StationCode) -> Option<&'static str> {
    AIRPORTS
        .iter()
        .find(|(code, _)| *code == station.as_str())
        .map(|(_, name)| *name)
}
