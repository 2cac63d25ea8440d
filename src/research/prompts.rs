// Default templates for the four research stages

/// Extracts facts from raw search context.
/// Inputs: `query`, `search_results`
pub const RESEARCHER_TEMPLATE: &str = r#"You are an Expert Research Agent. Analyze this search data about: {query}

SEARCH RESULTS:
{search_results}

Extract:
1. Specific organization names, funding amounts, recent developments
2. Key players and leaders in the space
3. Concrete statistics and growth data
4. Expert quotes and industry insights
5. Recent news and technological breakthroughs

Focus on factual, recent information that directly answers the query."#;

/// Condenses the researcher output into a structured summary.
/// Inputs: `research_content`
pub const SUMMARIZER_TEMPLATE: &str = r#"Process this research content: {research_content}

Create structured summary:

## Key Players
- Name, founding year, headquarters
- Core technology and focus
- Key products/services and recent funding

## Market Intelligence
- Market size, growth statistics
- Investment trends, key partnerships
- Technology applications and innovations

## Recent Developments
- Latest news, product launches
- Awards, recognitions, expansions

Include specific numbers, dates, and names."#;

/// Reviews the summary for accuracy and gaps.
/// Inputs: `summary_content`
pub const CRITIC_TEMPLATE: &str = r#"Evaluate this content for accuracy: {summary_content}

Analyze:
- Information consistency and conflicts
- Data completeness and currency
- Source credibility and reliability
- Missing critical information

Provide reliability score (1-10) and improvement recommendations."#;

/// Produces the final markdown-ish report.
/// Inputs: `research_data`, `summary`, `critique`
pub const WRITER_TEMPLATE: &str = r#"Create a comprehensive research report using:

RESEARCH: {research_data}
SUMMARY: {summary}
CRITIQUE: {critique}

Structure:

# Executive Summary
Brief overview of the topic, key insights, and top performers.

# Key Players

For each organization:
## [Name]
- **Founded:** Year, Location
- **Focus Area:** Main application
- **Technology:** Core technologies
- **Funding:** Latest rounds, total raised, valuation
- **Products:** Main offerings
- **Recent News:** Latest developments

# Market Analysis
- **Market Size:** Current and projected figures
- **Growth Trends:** Investment patterns and statistics
- **Key Technologies:** Popular applications
- **Challenges:** Market obstacles and opportunities

# Investment Landscape
- **Funding Trends:** Recent investment patterns
- **Key Investors:** Major VCs and sources
- **Success Stories:** Notable achievements

# Future Outlook
- **Emerging Trends:** Next-gen technologies
- **Predictions:** Market forecasts
- **Opportunities:** Development areas

# References and Sources
List sources with clickable URLs and publication dates.

Use professional tone with specific data, figures, and details."#;
